use crate::app::ports::HttpClientPort;
use crate::config::CrawlConfig;
use crate::resolver::PosterResolver;
use crate::types::{EventRecord, MissReason, ResolutionOutcome, RunSummary};
use chrono::Utc;
use metrics::{counter, histogram};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{info, info_span, Instrument};

/// Drives the resolver over the whole dataset, one event at a time.
///
/// The pause after every event is the only rate limit, and it is global
/// because fetches never overlap.
pub struct CrawlOrchestrator {
    resolver: PosterResolver,
    delay: Duration,
}

/// Running totals owned by a single `run` call.
#[derive(Default)]
struct Tally {
    found: usize,
    not_found: usize,
    misses: BTreeMap<MissReason, usize>,
    records: Vec<EventRecord>,
}

impl Tally {
    fn record(&mut self, event: &EventRecord, outcome: &ResolutionOutcome) {
        match outcome {
            ResolutionOutcome::Found(_) => self.found += 1,
            ResolutionOutcome::NotFound(reason) => {
                self.not_found += 1;
                *self.misses.entry(*reason).or_default() += 1;
            }
        }
        self.records.push(event.merged_with(outcome));
    }
}

impl CrawlOrchestrator {
    pub fn new(resolver: PosterResolver, delay: Duration) -> Self {
        Self { resolver, delay }
    }

    pub fn from_config(http: Arc<dyn HttpClientPort>, config: &CrawlConfig) -> Self {
        Self::new(PosterResolver::new(http, config.timeout()), config.delay())
    }

    /// Crawls every event in input order and returns the merged dataset.
    ///
    /// The summary is only produced once the last event is done; there is no
    /// partially filled result.
    pub async fn run(&self, events: &[EventRecord]) -> RunSummary {
        let started = Instant::now();
        let total = events.len();
        info!("Starting poster crawl for {} events", total);
        counter!("poster_crawl_runs_total").increment(1);

        let mut tally = Tally {
            records: Vec::with_capacity(total),
            ..Tally::default()
        };

        for (i, event) in events.iter().enumerate() {
            let span = info_span!("event", index = i + 1, name = %event.name);
            let outcome = self
                .resolver
                .resolve(event.homepage_url())
                .instrument(span)
                .await;

            match &outcome {
                ResolutionOutcome::Found(url) => {
                    counter!("poster_crawl_found_total").increment(1);
                    info!("[{}/{}] {} ✓ {}", i + 1, total, event.name, url);
                    println!("[{}/{}] {}... ✓ {}", i + 1, total, truncate(&event.name, 30), truncate(url, 50));
                }
                ResolutionOutcome::NotFound(reason) => {
                    counter!("poster_crawl_not_found_total", "reason" => reason.to_string()).increment(1);
                    info!("[{}/{}] {} ✗ {}", i + 1, total, event.name, reason);
                    println!("[{}/{}] {}... ✗ no poster ({})", i + 1, total, truncate(&event.name, 30), reason);
                }
            }
            tally.record(event, &outcome);

            tokio::time::sleep(self.delay).await;
        }

        let elapsed = started.elapsed();
        histogram!("poster_crawl_duration_seconds").record(elapsed.as_secs_f64());
        info!("Done! succeeded: {}, failed: {}", tally.found, tally.not_found);

        RunSummary {
            found: tally.found,
            not_found: tally.not_found,
            records: tally.records,
            misses: tally.misses,
            generated_at: Utc::now(),
            elapsed,
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    s.chars().take(max_chars).collect()
}
