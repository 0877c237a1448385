use crate::common::{quick_config, meta};
use phishguard::classifier::bootstrap::{LEGITIMATE_URLS, PHISHING_URLS};
use phishguard::classifier::ModelSource;
use phishguard::semantic::{CharNgramModel, NgramParams};
use phishguard::{PhishingDetector, SemanticMode, ThreatIntelStore};
use std::sync::Arc;
use tempfile::tempdir;

#[test]
fn persisted_model_is_loaded_at_startup() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("classifier.json");

    let first = PhishingDetector::new(quick_config(), Arc::new(ThreatIntelStore::new())).unwrap();
    let urls: Vec<&str> = LEGITIMATE_URLS.iter().chain(PHISHING_URLS).copied().collect();
    let labels: Vec<bool> = urls.iter().map(|u| !u.starts_with("https://")).collect();
    let report = first.train(&urls, &labels).unwrap();
    assert!(report.train_accuracy > 0.9);
    first.classifier().current().save(&path).unwrap();

    let mut cfg = quick_config();
    cfg.classifier.model_path = Some(path.clone());
    let second = PhishingDetector::new(cfg, Arc::new(ThreatIntelStore::new())).unwrap();
    let info = second.classifier().model_info();
    assert_eq!(info.source, ModelSource::Trained);
    assert_eq!(info.fingerprint, report.model.fingerprint);
}

#[test]
fn corrupt_model_falls_back_to_bootstrap() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("classifier.json");
    std::fs::write(&path, br#"{"format_version": 1, "weights": [1.0]}"#).unwrap();

    let mut cfg = quick_config();
    cfg.classifier.model_path = Some(path);
    let d = PhishingDetector::new(cfg, Arc::new(ThreatIntelStore::new())).unwrap();
    assert_eq!(d.classifier().model_info().source, ModelSource::Bootstrap);
    assert!(d.classify("http://paypa1-secure.com/login", &meta()).is_phishing);
}

#[test]
fn semantic_artifact_switches_to_hybrid() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("ngram.json");
    let samples: Vec<(&str, bool)> = LEGITIMATE_URLS
        .iter()
        .map(|u| (*u, false))
        .chain(PHISHING_URLS.iter().map(|u| (*u, true)))
        .collect();
    let params = NgramParams {
        buckets: 512,
        epochs: 50,
        ..NgramParams::default()
    };
    CharNgramModel::fit(&samples, params).unwrap().save(&path).unwrap();

    let mut cfg = quick_config();
    cfg.semantic.model_path = Some(path);
    let d = PhishingDetector::new(cfg, Arc::new(ThreatIntelStore::new())).unwrap();
    assert_eq!(d.semantic().mode(), SemanticMode::Hybrid);

    let r = d.classify("http://amazon-verify.tk/account", &meta());
    let sem = r.details.semantic.unwrap();
    assert_eq!(sem.mode, SemanticMode::Hybrid);
    assert!(sem.primary_score.is_some());
}

#[test]
fn missing_semantic_artifact_stays_in_pattern_mode() {
    let mut cfg = quick_config();
    cfg.semantic.model_path = Some("/definitely/not/here.json".into());
    let d = PhishingDetector::new(cfg, Arc::new(ThreatIntelStore::new())).unwrap();
    let r = d.classify("http://amazon-verify.tk/account", &meta());
    assert_eq!(r.details.semantic.unwrap().mode, SemanticMode::Pattern);
}
