mod common;

use common::FakeHttp;
use poster_crawler::resolver::PosterResolver;
use poster_crawler::types::{MissReason, ResolutionOutcome};
use std::sync::Arc;
use std::time::Duration;

const OG_AND_POSTER: &str = r#"<!DOCTYPE html>
<html><head>
  <meta charset="utf-8">
  <meta property="og:title" content="2026 Spring Trail">
  <meta property="og:image" content="/uploads/og-share.jpg">
</head><body>
  <img src="/uploads/poster.jpg" alt="poster">
</body></html>"#;

fn resolver(http: Arc<FakeHttp>) -> PosterResolver {
    PosterResolver::new(http, Duration::from_secs(10))
}

#[tokio::test]
async fn missing_homepage_makes_no_request() {
    let http = Arc::new(FakeHttp::new());
    let resolver = resolver(http.clone());

    assert_eq!(
        resolver.resolve(None).await,
        ResolutionOutcome::NotFound(MissReason::NoHomepage)
    );
    assert_eq!(
        resolver.resolve(Some("")).await,
        ResolutionOutcome::NotFound(MissReason::NoHomepage)
    );
    assert_eq!(
        resolver.resolve(Some("   ")).await,
        ResolutionOutcome::NotFound(MissReason::NoHomepage)
    );
    assert_eq!(http.calls(), 0);
}

#[tokio::test]
async fn invalid_homepage_makes_no_request() {
    let http = Arc::new(FakeHttp::new());
    let outcome = resolver(http.clone()).resolve(Some("www.example.com/race")).await;

    assert_eq!(outcome, ResolutionOutcome::NotFound(MissReason::InvalidHomepage));
    assert_eq!(http.calls(), 0);
}

#[tokio::test]
async fn open_graph_wins_over_keyword_image() {
    let http = Arc::new(FakeHttp::new().with_page("http://example.com/events/x", OG_AND_POSTER));
    let outcome = resolver(http.clone()).resolve(Some("http://example.com/events/x")).await;

    assert_eq!(
        outcome,
        ResolutionOutcome::Found("http://example.com/uploads/og-share.jpg".to_string())
    );
    assert_eq!(http.calls(), 1);
}

#[tokio::test]
async fn resolving_twice_gives_identical_result() {
    let http = Arc::new(FakeHttp::new().with_page("http://example.com/events/x", OG_AND_POSTER));
    let resolver = resolver(http.clone());

    let first = resolver.resolve(Some("http://example.com/events/x")).await;
    let second = resolver.resolve(Some("http://example.com/events/x")).await;
    assert_eq!(first, second);
    assert!(first.is_found());
}

#[tokio::test]
async fn bare_relative_path_is_host_rooted() {
    let html = r#"<img class="banner" src="img/p.png">"#;
    let http = Arc::new(FakeHttp::new().with_page("http://example.com/events/x", html));
    let outcome = resolver(http).resolve(Some("http://example.com/events/x")).await;

    assert_eq!(outcome.url(), Some("http://example.com/img/p.png"));
}

#[tokio::test]
async fn non_success_status_is_not_found_even_with_og_tag() {
    let http = Arc::new(FakeHttp::new().with_status("http://gone.test/", 404, OG_AND_POSTER));
    let outcome = resolver(http).resolve(Some("http://gone.test/")).await;

    assert_eq!(outcome, ResolutionOutcome::NotFound(MissReason::HttpStatus(404)));
}

#[tokio::test]
async fn network_error_is_not_found() {
    let http = Arc::new(FakeHttp::new().with_error("http://down.test/", "dns error"));
    let outcome = resolver(http).resolve(Some("http://down.test/")).await;

    assert_eq!(outcome, ResolutionOutcome::NotFound(MissReason::Network));
}

#[tokio::test]
async fn slow_host_times_out() {
    let http = Arc::new(FakeHttp::new().with_hang("http://slow.test/"));
    let resolver = PosterResolver::new(http.clone(), Duration::from_millis(50));

    let outcome = resolver.resolve(Some("http://slow.test/")).await;
    assert_eq!(outcome, ResolutionOutcome::NotFound(MissReason::Timeout));
    assert_eq!(http.calls(), 1);
}

#[tokio::test]
async fn page_without_signal_is_not_found() {
    let html = "<html><body><img src='/a.png'><p>See you there</p></body></html>";
    let http = Arc::new(FakeHttp::new().with_page("https://plain.test/", html));
    let outcome = resolver(http).resolve(Some("https://plain.test/")).await;

    assert_eq!(outcome, ResolutionOutcome::NotFound(MissReason::NoImageSignal));
}

#[tokio::test]
async fn binary_response_is_not_scanned() {
    // An image URL used as a homepage; the bytes happen to contain a keyword
    let http = Arc::new(FakeHttp::new().with_content(
        "http://cdn.test/poster.jpg",
        "image/jpeg",
        r#"<img src="/poster.jpg">"#,
    ));
    let outcome = resolver(http).resolve(Some("http://cdn.test/poster.jpg")).await;

    assert_eq!(outcome, ResolutionOutcome::NotFound(MissReason::NotHtml));
}

#[tokio::test]
async fn page_without_content_type_is_still_scanned() {
    let http = Arc::new(FakeHttp::new().with_content(
        "http://bare.test/",
        "application/octet-stream",
        r#"<meta property="og:image" content="/cover.png">"#,
    ));
    let outcome = resolver(http).resolve(Some("http://bare.test/")).await;

    assert_eq!(outcome.url(), Some("http://bare.test/cover.png"));
}
