//! Reading the event dataset and writing the replacement snapshot.

use crate::constants::CATEGORIES;
use crate::error::{CrawlerError, Result};
use crate::types::{EventRecord, RunSummary};
use chrono::{DateTime, SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

static JS_EVENTS_EXPORT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\s*export\s+const\s+events\s*=\s*").unwrap());

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotMetadata {
    pub total_count: usize,
    pub generated_at: String,
    pub categories: Vec<String>,
}

impl SnapshotMetadata {
    pub fn new(total_count: usize, generated_at: DateTime<Utc>) -> Self {
        Self {
            total_count,
            generated_at: generated_at.to_rfc3339_opts(SecondsFormat::Millis, true),
            categories: CATEGORIES.iter().map(|c| c.to_string()).collect(),
        }
    }
}

/// The replacement dataset: records plus the metadata block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub events: Vec<EventRecord>,
    pub metadata: SnapshotMetadata,
}

impl Snapshot {
    pub fn from_summary(summary: &RunSummary) -> Self {
        Self {
            metadata: SnapshotMetadata::new(summary.records.len(), summary.generated_at),
            events: summary.records.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotFormat {
    Json,
    /// `export const events = [...]` followed by `export const metadata = {...}`.
    JsModule,
}

impl SnapshotFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("js") || ext.eq_ignore_ascii_case("mjs") => {
                SnapshotFormat::JsModule
            }
            _ => SnapshotFormat::Json,
        }
    }
}

/// Loads events from a JSON array, a JSON snapshot document, or a JS data
/// module exporting `events`.
pub fn load_events(path: impl AsRef<Path>) -> Result<Vec<EventRecord>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    let events = parse_events(&content).map_err(|message| CrawlerError::Dataset {
        path: path.display().to_string(),
        message,
    })?;
    info!("Loaded {} events from {}", events.len(), path.display());
    Ok(events)
}

pub fn parse_events(content: &str) -> std::result::Result<Vec<EventRecord>, String> {
    let trimmed = content.trim_start_matches('\u{feff}').trim();

    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).map_err(|e| e.to_string());
    }
    if trimmed.starts_with('{') {
        #[derive(Deserialize)]
        struct SnapshotEvents {
            events: Vec<EventRecord>,
        }
        return serde_json::from_str::<SnapshotEvents>(trimmed)
            .map(|s| s.events)
            .map_err(|e| e.to_string());
    }
    if let Some(json) = js_events_array(trimmed) {
        return serde_json::from_str(&json).map_err(|e| e.to_string());
    }
    Err("expected a JSON array, a snapshot document or `export const events = [...]`".to_string())
}

/// The array literal assigned to `export const events`, as JSON.
///
/// Scans up to the matching `]` while tracking string literals, so brackets,
/// commas or the word `export` inside values don't end the array early.
/// Trailing commas before `]`/`}` are dropped on the way.
fn js_events_array(module: &str) -> Option<String> {
    let start = JS_EVENTS_EXPORT_RE.find(module)?.end();
    let body = &module[start..];
    if !body.starts_with('[') {
        return None;
    }

    let mut out = String::with_capacity(body.len());
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut pending_comma = false;

    for c in body.chars() {
        if let Some(q) = quote {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == q {
                quote = None;
            }
            continue;
        }

        if c.is_whitespace() {
            out.push(c);
            continue;
        }
        if pending_comma {
            pending_comma = false;
            if c != ']' && c != '}' {
                out.push(',');
            }
        }
        match c {
            ',' => {
                pending_comma = true;
                continue;
            }
            '"' | '\'' => quote = Some(c),
            '[' | '{' => depth += 1,
            ']' | '}' => depth = depth.checked_sub(1)?,
            _ => {}
        }
        out.push(c);
        if depth == 0 {
            return Some(out);
        }
    }
    None
}

pub fn render_snapshot(snapshot: &Snapshot, format: SnapshotFormat) -> Result<String> {
    match format {
        SnapshotFormat::Json => Ok(serde_json::to_string_pretty(snapshot)? + "\n"),
        SnapshotFormat::JsModule => Ok(format!(
            "export const events = {};\n\nexport const metadata = {};\n",
            serde_json::to_string_pretty(&snapshot.events)?,
            serde_json::to_string_pretty(&snapshot.metadata)?,
        )),
    }
}

/// Writes the snapshot next to its final location first and renames it into
/// place, so readers never see a half-written dataset.
pub fn write_snapshot(path: impl AsRef<Path>, snapshot: &Snapshot) -> Result<PathBuf> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let rendered = render_snapshot(snapshot, SnapshotFormat::from_path(path))?;
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    fs::write(&tmp, rendered)?;
    fs::rename(&tmp, path)?;
    debug!("Wrote snapshot with {} events to {}", snapshot.events.len(), path.display());
    Ok(path.to_path_buf())
}
