use crate::app::ports::HttpClientPort;
use crate::extract::{extract_poster_url, parse_homepage};
use crate::types::{MissReason, ResolutionOutcome};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Resolves an event homepage to a single poster image URL.
///
/// Every failure mode collapses into `ResolutionOutcome::NotFound`; nothing
/// here returns an error to the caller.
pub struct PosterResolver {
    http: Arc<dyn HttpClientPort>,
    timeout: Duration,
}

impl PosterResolver {
    pub fn new(http: Arc<dyn HttpClientPort>, timeout: Duration) -> Self {
        Self { http, timeout }
    }

    /// Fetches `homepage` once and extracts its poster. No retries.
    #[instrument(skip(self))]
    pub async fn resolve(&self, homepage: Option<&str>) -> ResolutionOutcome {
        let homepage = match homepage.map(str::trim) {
            Some(url) if !url.is_empty() => url,
            _ => return ResolutionOutcome::NotFound(MissReason::NoHomepage),
        };
        let Some(base) = parse_homepage(homepage) else {
            warn!("Skipping unparseable homepage url");
            return ResolutionOutcome::NotFound(MissReason::InvalidHomepage);
        };

        // Dropping the future on expiry cancels the in-flight request
        let response = match tokio::time::timeout(self.timeout, self.http.get(homepage)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                warn!("Fetch failed: {}", e);
                return ResolutionOutcome::NotFound(MissReason::Network);
            }
            Err(_) => {
                warn!("Fetch timed out after {:?}", self.timeout);
                return ResolutionOutcome::NotFound(MissReason::Timeout);
            }
        };

        if !response.is_success() {
            debug!("Non-success status {}", response.status);
            return ResolutionOutcome::NotFound(MissReason::HttpStatus(response.status));
        }

        if !response.may_be_html() {
            debug!("Skipping {} body", response.content_type);
            return ResolutionOutcome::NotFound(MissReason::NotHtml);
        }

        match extract_poster_url(&response.text(), &base) {
            Some(url) => ResolutionOutcome::Found(url),
            None => ResolutionOutcome::NotFound(MissReason::NoImageSignal),
        }
    }
}
