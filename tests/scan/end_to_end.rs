use crate::common::{detector, detector_with, meta, urls};
use phishguard::detector::{REASON_SAFE, REASON_WHITELISTED};
use phishguard::{extract, RuleId, ScanMetadata, ScanStatus, Severity, ThreatIntelStore, Verdict};

#[test]
fn google_search_is_safe_via_whitelist() {
    let d = detector_with(ThreatIntelStore::with_defaults());
    let r = d.classify("https://www.google.com/search?q=weather", &meta());
    assert_eq!(r.verdict, Verdict::Safe);
    assert!(r.combined_score < 0.2);
    assert_eq!(r.reason, REASON_WHITELISTED);
}

#[test]
fn google_search_is_safe_without_whitelist() {
    let r = detector().classify("https://www.google.com/search?q=weather", &meta());
    assert_eq!(r.verdict, Verdict::Safe);
    assert!(r.combined_score < 0.2, "combined {}", r.combined_score);
    assert!(r.matched_rules.is_empty());
    assert_eq!(r.reason, REASON_SAFE);
    assert!(r.details.ml.as_ref().unwrap().dampened);
    assert!(r.details.rules.as_ref().unwrap().is_known_legitimate);
}

#[test]
fn brand_in_subdomain_is_malicious() {
    let r = detector().classify("http://paypal.secure-login.malicious.com/signin", &meta());
    assert!(r.has_rule(RuleId::BrandInSubdomain) || r.has_rule(RuleId::BrandMimicry));
    assert!(r
        .matched_rules
        .iter()
        .any(|m| m.severity >= Severity::High));
    assert_eq!(r.verdict, Verdict::Malicious);
    assert_eq!(r.status, ScanStatus::Blocked);
    assert!(r.should_alert());
}

#[test]
fn ip_host_is_high_severity() {
    let r = detector().classify("http://192.168.1.1/paypal/login.html", &meta());
    assert!(r.has_rule(RuleId::IpAddress));
    assert!(r.features.as_ref().unwrap().has_ip);
    assert!(r.severity >= Severity::High);
    assert!(r.is_phishing);
}

#[test]
fn typosquat_and_homograph_force_critical_floor() {
    let d = detector();
    for url in ["http://paypa1-secure.com/login", "http://pаypal.com/login"] {
        let r = d.classify(url, &meta());
        assert!(r.combined_score >= 0.85, "{url}: {}", r.combined_score);
        assert_eq!(r.severity, Severity::Critical, "{url}");
        assert!(r.matched_rules.iter().any(|m| m.severity == Severity::Critical));
    }
    let f = extract("http://paypa1-secure.com/login");
    assert_eq!(f.typosquatting_target.as_deref(), Some("paypal"));
    assert!(f.typosquatting_similarity > 0.7);
    assert!(extract("http://pаypal.com/login").has_homograph);
}

#[test]
fn malicious_corpus_is_flagged() {
    let d = detector();
    for url in urls::MALICIOUS {
        let r = d.classify(url, &meta());
        assert_eq!(r.verdict, Verdict::Malicious, "{url}: {:?}", r.matched_rules);
    }
}

#[test]
fn benign_corpus_is_not_flagged() {
    let d = detector_with(ThreatIntelStore::with_defaults());
    for url in urls::BENIGN {
        let r = d.classify(url, &meta());
        assert!(!r.is_phishing, "{url}: {} {:?}", r.combined_score, r.matched_rules);
    }
}

#[test]
fn malformed_input_never_fails() {
    let d = detector();
    for url in urls::MALFORMED {
        let r = d.classify(url, &ScanMetadata::default());
        assert!((0.0..=1.0).contains(&r.combined_score), "{url:?}");
        assert!(r.features.is_some());
    }
}

#[test]
fn dangerous_scheme_is_critical() {
    let r = detector().classify("javascript:alert(document.cookie)", &meta());
    assert!(r.has_rule(RuleId::DangerousScheme));
    assert_eq!(r.verdict, Verdict::Malicious);
}

#[test]
fn metadata_and_components_are_reported() {
    let r = detector().classify("http://amazon-verify.tk/account", &meta());
    assert_eq!(r.metadata, meta());
    let w = r.details.weights;
    assert!((w.rule + w.ml + w.semantic - 1.0).abs() < 1e-9);
    assert!(r.details.semantic.is_some());
    assert_eq!(r.domain, "amazon-verify.tk");
    assert!(r.has_rule(RuleId::SuspiciousTld));
}

#[test]
fn result_round_trips_through_json() {
    let r = detector().classify("http://192.168.1.1/paypal/login.html", &meta());
    let json = r.to_json_string().unwrap();
    assert!(json.contains("\"verdict\":\"malicious\""));
    let back = phishguard::ScanResult::from_json_str(&json).unwrap();
    assert_eq!(back.matched_rules, r.matched_rules);
    assert_eq!(back.verdict, r.verdict);
}
