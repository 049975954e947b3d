/// Desktop browser identity sent with every homepage fetch. Plenty of small
/// event sites answer 403 to clients without one.
pub const USER_AGENT: &str =
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/114.0.0.0 Safari/537.36";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_DELAY_MS: u64 = 500;

pub const DEFAULT_CONFIG_PATH: &str = "crawler.toml";

// Environment overrides, applied after the config file
pub const ENV_TIMEOUT_SECS: &str = "POSTER_CRAWLER_TIMEOUT_SECS";
pub const ENV_DELAY_MS: &str = "POSTER_CRAWLER_DELAY_MS";

/// Substrings that mark an `<img>` tag as a likely poster when there is no
/// Open Graph image.
pub const POSTER_KEYWORDS: [&str; 4] = ["poster", "banner", "main", "logo"];

/// Fixed category taxonomy written to the snapshot metadata block.
pub const CATEGORIES: [&str; 3] = ["cycling", "marathon", "trail"];
