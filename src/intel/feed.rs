//! Blacklist feeds: newline-delimited domain lists with `#` comments.

use super::normalize_indicator;
use crate::error::{PhishGuardError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Anything that can produce the body of a feed.
///
/// Fetching happens outside the scoring path; callers decide how and when
/// (file, HTTP client, database export).
pub trait FeedSource: Send + Sync {
    /// Label used in logs and reports.
    fn name(&self) -> &str;
    fn fetch(&self) -> Result<String>;
}

/// Feed read from a local file.
#[derive(Debug, Clone)]
pub struct FileFeed {
    path: PathBuf,
    name: String,
}

impl FileFeed {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref().to_path_buf();
        let name = path.display().to_string();
        Self { path, name }
    }
}

impl FeedSource for FileFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<String> {
        std::fs::read_to_string(&self.path)
            .map_err(|e| PhishGuardError::Feed(format!("{}: {e}", self.name)))
    }
}

/// In-memory feed body, mostly for tests and embedding.
#[derive(Debug, Clone)]
pub struct StaticFeed {
    name: String,
    body: String,
}

impl StaticFeed {
    pub fn new(name: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            body: body.into(),
        }
    }
}

impl FeedSource for StaticFeed {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self) -> Result<String> {
        Ok(self.body.clone())
    }
}

/// Parsed feed body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedFeed {
    /// Normalized, distinct indicators in file order.
    pub indicators: Vec<String>,
    /// Non-comment lines that did not normalize to a domain.
    pub rejected: usize,
}

/// Parse a feed body. Blank lines and `#` comments are skipped; everything
/// else is normalized like an administrative indicator.
pub fn parse_feed(text: &str) -> ParsedFeed {
    let mut seen = HashSet::new();
    let mut out = ParsedFeed::default();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match normalize_indicator(line) {
            Some(ind) => {
                if seen.insert(ind.clone()) {
                    out.indicators.push(ind);
                }
            }
            None => out.rejected += 1,
        }
    }
    out
}

/// Outcome of a successful feed sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedSyncReport {
    pub source: String,
    /// Indicators not previously blacklisted.
    pub added: usize,
    pub rejected: usize,
    pub total_blacklisted: usize,
    pub updated_at: DateTime<Utc>,
}
