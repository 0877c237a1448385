//! Threat intelligence gate: process-wide blacklist and whitelist.
//!
//! The store is owned explicitly and shared as `Arc<ThreatIntelStore>`.
//! Sets sit behind `RwLock`s so scans read concurrently while
//! administrative writes and feed syncs are serialized.

pub mod feed;

use crate::config::IntelConfig;
use crate::error::{PhishGuardError, Result};
use crate::features::suffix_chain;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{info, warn};
use url::Url;

pub use feed::{parse_feed, FeedSource, FeedSyncReport, FileFeed, ParsedFeed, StaticFeed};

/// Domains trusted out of the box.
pub const DEFAULT_WHITELIST: &[&str] = &[
    "google.com",
    "youtube.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "github.com",
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "netflix.com",
    "reddit.com",
    "wikipedia.org",
    "stackoverflow.com",
    "cloudflare.com",
    "googleapis.com",
    "gstatic.com",
    "googleusercontent.com",
];

/// Which indicator list an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ListKind {
    Blacklist,
    Whitelist,
}

impl fmt::Display for ListKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ListKind::Blacklist => write!(f, "blacklist"),
            ListKind::Whitelist => write!(f, "whitelist"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThreatLevel {
    Safe,
    Malicious,
    Unknown,
}

/// Result of a gate lookup. `blacklisted` is never set together with
/// `whitelisted`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelCheck {
    pub domain: String,
    pub whitelisted: bool,
    pub blacklisted: bool,
    pub threat_level: ThreatLevel,
    /// Suffix of the domain that matched, if any.
    pub matched_indicator: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntelStats {
    pub blacklist_count: usize,
    pub whitelist_count: usize,
    pub last_update: Option<DateTime<Utc>>,
}

/// Normalize an indicator to a bare lowercase host.
///
/// Trims whitespace, strips a `*.` wildcard and trailing dots, and reduces
/// URL-shaped input (`http://host/path`, `host:port/path`) to its host.
/// Returns `None` when nothing host-like remains.
pub fn normalize_indicator(raw: &str) -> Option<String> {
    let s = raw.trim().to_ascii_lowercase();
    let s = s.strip_prefix("*.").unwrap_or(&s);
    if s.is_empty() {
        return None;
    }
    let candidate = if s.contains("://") {
        s.to_string()
    } else {
        format!("http://{s}")
    };
    let url = Url::parse(&candidate).ok()?;
    let host = url.host_str()?.trim_end_matches('.');
    let host = host.strip_prefix("*.").unwrap_or(host);
    if host.is_empty() {
        None
    } else {
        Some(host.to_string())
    }
}

/// Shared blacklist/whitelist store.
#[derive(Debug, Default)]
pub struct ThreatIntelStore {
    blacklist: RwLock<HashSet<String>>,
    whitelist: RwLock<HashSet<String>>,
    last_update: RwLock<Option<DateTime<Utc>>>,
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

impl ThreatIntelStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with [`DEFAULT_WHITELIST`].
    pub fn with_defaults() -> Self {
        let store = Self::new();
        write(&store.whitelist).extend(DEFAULT_WHITELIST.iter().map(|d| d.to_string()));
        store
    }

    /// Store seeded according to configuration. A configured feed that
    /// cannot be read is logged and skipped.
    pub fn from_config(cfg: &IntelConfig) -> Self {
        let store = if cfg.seed_default_whitelist {
            Self::with_defaults()
        } else {
            Self::new()
        };
        if let Some(path) = &cfg.feed_path {
            if let Err(e) = store.sync_feed(&FileFeed::new(path)) {
                warn!(error = %e, "startup feed unavailable; continuing without it");
            }
        }
        store
    }

    fn list(&self, kind: ListKind) -> &RwLock<HashSet<String>> {
        match kind {
            ListKind::Blacklist => &self.blacklist,
            ListKind::Whitelist => &self.whitelist,
        }
    }

    fn stamp(&self) {
        *write(&self.last_update) = Some(Utc::now());
    }

    fn find_in(&self, kind: ListKind, domain: &str) -> Option<String> {
        let set = read(self.list(kind));
        if set.is_empty() {
            return None;
        }
        suffix_chain(domain)
            .find(|s| set.contains(*s))
            .map(str::to_string)
    }

    /// Look up a host or domain, walking its suffix chain. Whitelist wins.
    pub fn check_domain(&self, domain: &str) -> IntelCheck {
        let domain = domain.trim().trim_end_matches('.').to_ascii_lowercase();
        if let Some(hit) = self.find_in(ListKind::Whitelist, &domain) {
            return IntelCheck {
                domain,
                whitelisted: true,
                blacklisted: false,
                threat_level: ThreatLevel::Safe,
                matched_indicator: Some(hit),
            };
        }
        if let Some(hit) = self.find_in(ListKind::Blacklist, &domain) {
            return IntelCheck {
                domain,
                whitelisted: false,
                blacklisted: true,
                threat_level: ThreatLevel::Malicious,
                matched_indicator: Some(hit),
            };
        }
        IntelCheck {
            domain,
            whitelisted: false,
            blacklisted: false,
            threat_level: ThreatLevel::Unknown,
            matched_indicator: None,
        }
    }

    pub fn is_whitelisted(&self, domain: &str) -> bool {
        self.check_domain(domain).whitelisted
    }

    /// True when blacklisted and not whitelisted.
    pub fn is_blacklisted(&self, domain: &str) -> bool {
        self.check_domain(domain).blacklisted
    }

    /// Add an indicator. Returns `Ok(false)` if it was already present.
    pub fn add_indicator(&self, indicator: &str, kind: ListKind) -> Result<bool> {
        let normalized = normalize_indicator(indicator)
            .ok_or_else(|| PhishGuardError::InvalidUrl(format!("not a domain indicator: {indicator:?}")))?;
        let inserted = write(self.list(kind)).insert(normalized);
        if inserted {
            self.stamp();
        }
        Ok(inserted)
    }

    /// Remove an indicator. Returns whether it was present.
    pub fn remove_indicator(&self, indicator: &str, kind: ListKind) -> bool {
        let Some(normalized) = normalize_indicator(indicator) else {
            return false;
        };
        let removed = write(self.list(kind)).remove(&normalized);
        if removed {
            self.stamp();
        }
        removed
    }

    /// Bulk import of `(indicator, list)` pairs, e.g. from a database
    /// export. Invalid indicators are skipped. Returns the number inserted.
    pub fn import<I, S>(&self, entries: I) -> usize
    where
        I: IntoIterator<Item = (S, ListKind)>,
        S: AsRef<str>,
    {
        let mut added = 0;
        for (indicator, kind) in entries {
            if let Some(normalized) = normalize_indicator(indicator.as_ref()) {
                if write(self.list(kind)).insert(normalized) {
                    added += 1;
                }
            }
        }
        if added > 0 {
            self.stamp();
        }
        added
    }

    pub fn contains(&self, indicator: &str, kind: ListKind) -> bool {
        normalize_indicator(indicator)
            .map(|n| read(self.list(kind)).contains(&n))
            .unwrap_or(false)
    }

    pub fn stats(&self) -> IntelStats {
        IntelStats {
            blacklist_count: read(&self.blacklist).len(),
            whitelist_count: read(&self.whitelist).len(),
            last_update: *read(&self.last_update),
        }
    }

    /// Fetch a feed and merge it into the blacklist.
    ///
    /// On fetch failure the sets are left untouched and the error is
    /// returned to the caller only.
    pub fn sync_feed(&self, source: &dyn FeedSource) -> Result<FeedSyncReport> {
        let _span = crate::span_trace!("feed_sync", source = source.name()).entered();
        let body = match source.fetch() {
            Ok(body) => body,
            Err(e) => {
                warn!(source = source.name(), error = %e, "threat feed fetch failed");
                return Err(match e {
                    PhishGuardError::Feed(_) => e,
                    other => PhishGuardError::Feed(other.to_string()),
                });
            }
        };
        let parsed = parse_feed(&body);

        let (added, total_blacklisted) = {
            let mut set = write(&self.blacklist);
            let before = set.len();
            set.extend(parsed.indicators);
            (set.len() - before, set.len())
        };
        let updated_at = Utc::now();
        *write(&self.last_update) = Some(updated_at);

        info!(
            source = source.name(),
            added,
            rejected = parsed.rejected,
            total_blacklisted,
            "threat feed synced"
        );
        Ok(FeedSyncReport {
            source: source.name().to_string(),
            added,
            rejected: parsed.rejected,
            total_blacklisted,
            updated_at,
        })
    }
}
