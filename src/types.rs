use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

/// One event from the dataset.
///
/// Only the fields the crawler reads or writes are typed. Everything else
/// (`date`, `location`, `region`, `category`, `price`, ...) stays raw JSON in
/// `extra` so it is written back exactly as it was read. The two URL fields
/// remember whether the key was absent (`None`) or `null` (`Some(None)`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRecord {
    pub name: String,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub homepage_url: Option<Option<String>>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

// Only called when the key exists, so `null` becomes `Some(None)`
fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl EventRecord {
    pub fn homepage_url(&self) -> Option<&str> {
        self.homepage_url.as_ref().and_then(|u| u.as_deref())
    }

    pub fn poster_url(&self) -> Option<&str> {
        self.poster_url.as_ref().and_then(|u| u.as_deref())
    }

    /// A pass-through field, as read from the dataset.
    pub fn field(&self, key: &str) -> Option<&serde_json::Value> {
        self.extra.get(key)
    }

    /// Copy of this record with the poster upgraded when one was found.
    /// A miss keeps whatever poster the record already had.
    pub fn merged_with(&self, outcome: &ResolutionOutcome) -> EventRecord {
        let mut out = self.clone();
        if let ResolutionOutcome::Found(url) = outcome {
            out.poster_url = Some(Some(url.clone()));
        }
        out
    }
}

/// Why a homepage produced no poster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum MissReason {
    NoHomepage,
    InvalidHomepage,
    Network,
    Timeout,
    HttpStatus(u16),
    /// Response declared a media type that can't carry markup.
    NotHtml,
    NoImageSignal,
}

impl fmt::Display for MissReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MissReason::NoHomepage => write!(f, "no homepage"),
            MissReason::InvalidHomepage => write!(f, "invalid homepage url"),
            MissReason::Network => write!(f, "network error"),
            MissReason::Timeout => write!(f, "timed out"),
            MissReason::HttpStatus(code) => write!(f, "http status {code}"),
            MissReason::NotHtml => write!(f, "response is not html"),
            MissReason::NoImageSignal => write!(f, "no poster image on page"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionOutcome {
    /// Absolute, directly fetchable image URL.
    Found(String),
    NotFound(MissReason),
}

impl ResolutionOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, ResolutionOutcome::Found(_))
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            ResolutionOutcome::Found(url) => Some(url),
            ResolutionOutcome::NotFound(_) => None,
        }
    }
}

/// Result of a complete crawl over the dataset.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub found: usize,
    pub not_found: usize,
    /// Same length and order as the input events.
    pub records: Vec<EventRecord>,
    pub misses: BTreeMap<MissReason, usize>,
    pub generated_at: DateTime<Utc>,
    pub elapsed: Duration,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.found + self.not_found
    }
}
