//! Shared fakes for the integration tests

use async_trait::async_trait;
use poster_crawler::app::ports::{HttpClientPort, HttpGetResult};
use poster_crawler::types::EventRecord;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

#[derive(Clone)]
pub enum FakeResponse {
    Page { status: u16, content_type: String, body: String },
    Error(String),
    /// Never answers within any reasonable timeout
    Hang,
}

/// In-memory `HttpClientPort` keyed by exact URL. Unknown URLs fail like an
/// unreachable host.
#[derive(Default)]
pub struct FakeHttp {
    responses: HashMap<String, FakeResponse>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl FakeHttp {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: &str, html: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FakeResponse::Page { status: 200, content_type: "text/html".to_string(), body: html.to_string() },
        );
        self
    }

    pub fn with_content(mut self, url: &str, content_type: &str, body: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FakeResponse::Page { status: 200, content_type: content_type.to_string(), body: body.to_string() },
        );
        self
    }

    pub fn with_status(mut self, url: &str, status: u16, html: &str) -> Self {
        self.responses.insert(
            url.to_string(),
            FakeResponse::Page { status, content_type: "text/html".to_string(), body: html.to_string() },
        );
        self
    }

    pub fn with_error(mut self, url: &str, message: &str) -> Self {
        self.responses
            .insert(url.to_string(), FakeResponse::Error(message.to_string()));
        self
    }

    pub fn with_hang(mut self, url: &str) -> Self {
        self.responses.insert(url.to_string(), FakeResponse::Hang);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl HttpClientPort for FakeHttp {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());

        match self.responses.get(url).cloned() {
            Some(FakeResponse::Page { status, content_type, body }) => Ok(HttpGetResult {
                status,
                bytes: body.into_bytes(),
                content_type,
            }),
            Some(FakeResponse::Error(message)) => Err(message),
            Some(FakeResponse::Hang) => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Err("unreachable".to_string())
            }
            None => Err(format!("connection refused: {url}")),
        }
    }
}

#[allow(dead_code)]
pub fn event(name: &str, homepage: Option<&str>, poster: Option<&str>) -> EventRecord {
    serde_json::from_value(serde_json::json!({
        "name": name,
        "date": "2026-04-05",
        "location": "서울 여의도공원",
        "region": "전국",
        "category": "marathon",
        "homepageUrl": homepage,
        "posterUrl": poster,
        "price": 40000
    }))
    .unwrap()
}
