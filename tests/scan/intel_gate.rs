use crate::common::{detector_with, meta};
use phishguard::detector::{REASON_BLACKLISTED, REASON_WHITELISTED};
use phishguard::intel::feed::StaticFeed;
use phishguard::{ListKind, ScanStatus, Severity, ThreatIntelStore, Verdict};

#[test]
fn blacklisted_subdomain_is_blocked() {
    let intel = ThreatIntelStore::new();
    intel.add_indicator("bad-actor.net", ListKind::Blacklist).unwrap();
    let d = detector_with(intel);

    let r = d.classify("https://cdn.assets.bad-actor.net/x.js", &meta());
    assert_eq!(r.verdict, Verdict::Malicious);
    assert_eq!(r.severity, Severity::Critical);
    assert_eq!(r.status, ScanStatus::Blocked);
    assert_eq!(r.combined_score, 1.0);
    assert_eq!(r.reason, REASON_BLACKLISTED);
    assert!(r.features.is_none());
    assert_eq!(
        r.details.intel.matched_indicator.as_deref(),
        Some("bad-actor.net")
    );
}

#[test]
fn whitelist_beats_blacklist_and_heuristics() {
    let intel = ThreatIntelStore::new();
    intel.add_indicator("paypa1-secure.com", ListKind::Blacklist).unwrap();
    intel.add_indicator("paypa1-secure.com", ListKind::Whitelist).unwrap();
    let d = detector_with(intel);

    let r = d.classify("http://paypa1-secure.com/login", &meta());
    assert_eq!(r.verdict, Verdict::Safe);
    assert_eq!(r.combined_score, 0.0);
    assert_eq!(r.reason, REASON_WHITELISTED);
    assert!(r.details.rules.is_none());
}

#[test]
fn removal_restores_scoring() {
    let intel = ThreatIntelStore::new();
    intel.add_indicator("example.org", ListKind::Blacklist).unwrap();
    let d = detector_with(intel);
    assert!(d.classify("https://example.org/", &meta()).is_phishing);

    assert!(d.intel().remove_indicator("example.org", ListKind::Blacklist));
    let r = d.classify("https://example.org/", &meta());
    assert!(r.features.is_some());
    assert_ne!(r.reason, REASON_BLACKLISTED);
}

#[test]
fn feed_sync_feeds_the_gate() {
    let d = detector_with(ThreatIntelStore::new());
    let feed = StaticFeed::new("test", "# comment\nphish.one\n\nPHISH.TWO.\nnot a host\n");
    let report = d.intel().sync_feed(&feed).unwrap();
    assert_eq!(report.added, 2);
    assert_eq!(d.intel().stats().blacklist_count, 2);

    let r = d.classify("http://login.phish.two/", &meta());
    assert_eq!(r.verdict, Verdict::Malicious);
    assert_eq!(r.reason, REASON_BLACKLISTED);
}
