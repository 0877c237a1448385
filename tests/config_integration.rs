use phishguard::config::*;
use phishguard::{PhishGuardError, PhishingDetector, RuleId, ThreatIntelStore};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

#[test]
fn test_scan_config_defaults() {
    let config = ScanConfig::default();

    assert_eq!(config.extractor.max_url_length, 8192);
    assert_eq!(config.rules.tiers.critical.base, 0.85);
    assert_eq!(config.rules.tiers.high.cap, 0.85);
    assert_eq!(config.rules.mixed_severity_bonus, 0.10);
    assert_eq!(config.classifier.legit_dampening, 0.1);
    assert_eq!(config.classifier.legit_cap, 0.15);
    assert_eq!(config.classifier.bootstrap.seed, 42);
    assert_eq!(config.semantic.primary_weight, 0.7);
    assert_eq!(config.ensemble.rule_weight, 0.35);
    assert_eq!(config.ensemble.ml_weight, 0.25);
    assert_eq!(config.ensemble.semantic_weight, 0.40);
    assert!(config.intel.seed_default_whitelist);
}

#[test]
fn test_severity_cutoff_defaults() {
    let cutoffs = SeverityCutoffs::default();

    assert_eq!(cutoffs.critical, 0.8);
    assert_eq!(cutoffs.high, 0.6);
    assert_eq!(cutoffs.medium, 0.4);
    assert_eq!(cutoffs.low, 0.2);
}

#[test]
fn test_load_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "rules": {{ "disabled": ["UrlShortener", "MissingHttps"] }},
            "ensemble": {{ "rule_weight": 0.5, "ml_weight": 0.2, "semantic_weight": 0.3 }},
            "intel": {{ "seed_default_whitelist": false }}
        }}"#
    )
    .unwrap();

    let config = ScanConfig::from_path(file.path()).unwrap();
    assert_eq!(config.rules.disabled, vec![RuleId::UrlShortener, RuleId::MissingHttps]);
    assert_eq!(config.ensemble.rule_weight, 0.5);
    assert_eq!(config.ensemble.critical_floor, 0.85);
    assert!(!config.intel.seed_default_whitelist);

    let detector = PhishingDetector::new(config, Arc::new(ThreatIntelStore::new())).unwrap();
    assert!(!detector
        .rules()
        .rules()
        .iter()
        .any(|r| r.id == RuleId::UrlShortener));
}

#[test]
fn test_invalid_files_are_config_or_serialization_errors() {
    let mut bad_weights = NamedTempFile::new().unwrap();
    write!(bad_weights, r#"{{"ensemble": {{"semantic_weight": 0.9}}}}"#).unwrap();
    assert!(matches!(
        ScanConfig::from_path(bad_weights.path()),
        Err(PhishGuardError::Config(_))
    ));

    let mut bad_range = NamedTempFile::new().unwrap();
    write!(bad_range, r#"{{"classifier": {{"threshold": 1.5}}}}"#).unwrap();
    assert!(matches!(
        ScanConfig::from_path(bad_range.path()),
        Err(PhishGuardError::Config(_))
    ));

    let mut not_json = NamedTempFile::new().unwrap();
    write!(not_json, "rule_weight = 0.5").unwrap();
    assert!(matches!(
        ScanConfig::from_path(not_json.path()),
        Err(PhishGuardError::Serialization(_))
    ));

    assert!(matches!(
        ScanConfig::from_path("/no/such/config.json"),
        Err(PhishGuardError::Io(_))
    ));
}

#[test]
fn test_feed_path_seeds_blacklist() {
    let mut feed = NamedTempFile::new().unwrap();
    writeln!(feed, "# test feed\nevil.example\nworse.example").unwrap();

    let config = IntelConfig {
        seed_default_whitelist: false,
        feed_path: Some(feed.path().to_path_buf()),
    };
    let store = ThreatIntelStore::from_config(&config);
    assert_eq!(store.stats().blacklist_count, 2);
    assert_eq!(store.stats().whitelist_count, 0);
    assert!(store.stats().last_update.is_some());
}

#[test]
fn test_config_round_trip() {
    let mut config = ScanConfig::default();
    config.semantic.token_weight = 0.25;
    config.rules.disabled.push(RuleId::LongUrl);

    let json = serde_json::to_string_pretty(&config).unwrap();
    let back = ScanConfig::from_json_str(&json).unwrap();
    assert_eq!(back, config);
}
