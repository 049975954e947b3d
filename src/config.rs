use crate::constants::{
    DEFAULT_DELAY_MS, DEFAULT_TIMEOUT_SECS, ENV_DELAY_MS, ENV_TIMEOUT_SECS, USER_AGENT,
};
use crate::error::{CrawlerError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Tunables for a crawl run. Every field is optional in the TOML file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct CrawlConfig {
    pub timeout_secs: u64,
    pub delay_ms: u64,
    pub user_agent: String,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            delay_ms: DEFAULT_DELAY_MS,
            user_agent: USER_AGENT.to_string(),
        }
    }
}

impl CrawlConfig {
    /// Loads the config file at `path`. A missing file yields the defaults;
    /// a present but malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            debug!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            CrawlerError::Config(format!("Failed to read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: CrawlConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies `POSTER_CRAWLER_*` environment overrides.
    pub fn with_env_overrides(mut self) -> Result<Self> {
        if let Some(secs) = read_env_u64(ENV_TIMEOUT_SECS)? {
            self.timeout_secs = secs;
        }
        if let Some(ms) = read_env_u64(ENV_DELAY_MS)? {
            self.delay_ms = ms;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs == 0 {
            return Err(CrawlerError::Config("timeout_secs must be greater than zero".into()));
        }
        if self.user_agent.trim().is_empty() {
            return Err(CrawlerError::Config("user_agent must not be empty".into()));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

fn read_env_u64(key: &str) -> Result<Option<u64>> {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| CrawlerError::Config(format!("{key}='{v}' is not a number: {e}"))),
        _ => Ok(None),
    }
}
