use async_trait::async_trait;

/// Outbound GET used by the resolver. Errors are plain strings: the resolver
/// only needs to know that the fetch failed, not how.
#[async_trait]
pub trait HttpClientPort: Send + Sync {
    async fn get(&self, url: &str) -> Result<HttpGetResult, String>;
}

#[derive(Clone, Debug)]
pub struct HttpGetResult {
    pub status: u16,
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl HttpGetResult {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// False only for media types that can't hold markup. A missing or
    /// generic content type still counts, since small sites often omit it.
    pub fn may_be_html(&self) -> bool {
        let media_type = self
            .content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        let binary_family = ["image/", "audio/", "video/", "font/"]
            .iter()
            .any(|prefix| media_type.starts_with(prefix));
        let binary_app = matches!(
            media_type.as_str(),
            "application/pdf" | "application/zip" | "application/json"
        );
        !(binary_family || binary_app)
    }

    /// Body as text; invalid UTF-8 sequences are replaced rather than rejected.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }
}
