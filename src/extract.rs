//! Heuristic poster discovery over raw HTML.
//!
//! This is deliberately not a DOM parser: tags are located with regexes and
//! attributes are read tag by tag, which is enough to survive the malformed
//! markup many small event sites serve.

use crate::constants::POSTER_KEYWORDS;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use std::borrow::Cow;

static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static META_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<meta\b[^>]*>").unwrap());
static IMG_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)<img\b[^>]*>").unwrap());
static ATTR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?i)([a-z_:][a-z0-9_:.-]*)\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#).unwrap()
});

// Schemes that can never point at a fetchable poster
const UNUSABLE_SCHEMES: [&str; 4] = ["data:", "javascript:", "blob:", "about:"];

/// Finds the best poster URL in `html`, resolved against `base`.
///
/// Open Graph images always win over `<img>` keyword matches; within each tier
/// the first usable candidate in document order is returned.
pub fn extract_poster_url(html: &str, base: &Url) -> Option<String> {
    let html = strip_comments(html);
    // Bound before returning: the chained iterators borrow `html`
    let found = og_image_candidates(&html)
        .chain(keyword_image_candidates(&html))
        .find_map(|candidate| absolutize(&candidate, base));
    found
}

/// `content` values of `<meta property="og:image">` tags, in document order.
/// `name="og:image"` is accepted as well since a fair number of CMS templates
/// emit it that way.
pub fn og_image_candidates(html: &str) -> impl Iterator<Item = String> + '_ {
    META_TAG_RE.find_iter(html).filter_map(|tag| {
        let tag = tag.as_str();
        let is_og_image = ["property", "name"].iter().any(|key| {
            attr_value(tag, key).is_some_and(|v| v.trim().eq_ignore_ascii_case("og:image"))
        });
        if !is_og_image {
            return None;
        }
        attr_value(tag, "content").and_then(clean_candidate)
    })
}

/// `src` values of `<img>` tags whose tag text mentions a poster keyword.
pub fn keyword_image_candidates(html: &str) -> impl Iterator<Item = String> + '_ {
    IMG_TAG_RE.find_iter(html).filter_map(|tag| {
        let tag = tag.as_str();
        let src = attr_value(tag, "src").and_then(clean_candidate)?;
        // src is part of the tag text, so one check covers both
        let lowered = tag.to_ascii_lowercase();
        POSTER_KEYWORDS
            .iter()
            .any(|kw| lowered.contains(kw))
            .then_some(src)
    })
}

/// Turns a candidate into an absolute URL using the scheme and host of `base`.
///
/// Relative paths without a leading slash are rooted at the host, not at the
/// page's directory: `img/p.png` on `http://a.test/events/x` becomes
/// `http://a.test/img/p.png`.
pub fn absolutize(candidate: &str, base: &Url) -> Option<String> {
    let candidate = candidate.trim();
    if candidate.is_empty() {
        return None;
    }
    let lowered = candidate.to_ascii_lowercase();
    if lowered.starts_with("http://") || lowered.starts_with("https://") {
        return Some(candidate.to_string());
    }
    if UNUSABLE_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }
    if candidate.starts_with("//") {
        return Some(format!("{}:{}", base.scheme(), candidate));
    }

    let origin = origin_of(base)?;
    if candidate.starts_with('/') {
        Some(format!("{origin}{candidate}"))
    } else {
        Some(format!("{origin}/{candidate}"))
    }
}

/// Parses a homepage into a base URL. Only absolute http(s) URLs with a host
/// qualify.
pub fn parse_homepage(homepage: &str) -> Option<Url> {
    let url = Url::parse(homepage.trim()).ok()?;
    let web = matches!(url.scheme(), "http" | "https");
    (web && url.host_str().is_some()).then_some(url)
}

fn origin_of(base: &Url) -> Option<String> {
    let host = base.host_str()?;
    Some(match base.port() {
        Some(port) => format!("{}://{}:{}", base.scheme(), host, port),
        None => format!("{}://{}", base.scheme(), host),
    })
}

fn strip_comments(html: &str) -> Cow<'_, str> {
    COMMENT_RE.replace_all(html, "")
}

fn attr_value<'a>(tag: &'a str, name: &str) -> Option<&'a str> {
    ATTR_RE.captures_iter(tag).find_map(|caps| {
        let key = caps.get(1)?.as_str();
        if !key.eq_ignore_ascii_case(name) {
            return None;
        }
        caps.get(2)
            .or_else(|| caps.get(3))
            .or_else(|| caps.get(4))
            .map(|m| m.as_str())
    })
}

fn clean_candidate(raw: &str) -> Option<String> {
    let decoded = html_escape::decode_html_entities(raw.trim());
    let decoded = decoded.trim();
    (!decoded.is_empty()).then(|| decoded.to_string())
}
