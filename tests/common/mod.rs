//! Common test utilities and helpers.

use chrono::{DateTime, TimeZone, Utc};
use phishguard::config::{BootstrapConfig, ClassifierConfig};
use phishguard::{PhishingDetector, ScanConfig, ScanMetadata, ThreatIntelStore};
use std::sync::Arc;

/// Default configuration with a smaller bootstrap corpus so tests start fast.
pub fn quick_config() -> ScanConfig {
    ScanConfig {
        classifier: ClassifierConfig {
            bootstrap: BootstrapConfig {
                synthetic_samples: 200,
                epochs: 100,
                ..BootstrapConfig::default()
            },
            ..ClassifierConfig::default()
        },
        ..ScanConfig::default()
    }
}

/// Detector over an empty intel store, so every URL reaches the scorers.
pub fn detector() -> PhishingDetector {
    detector_with(ThreatIntelStore::new())
}

pub fn detector_with(intel: ThreatIntelStore) -> PhishingDetector {
    PhishingDetector::new(quick_config(), Arc::new(intel)).unwrap()
}

pub fn meta() -> ScanMetadata {
    ScanMetadata {
        caller_id: Some("tester".into()),
        source_address: Some("10.1.2.3".into()),
        user_agent: Some("integration".into()),
    }
}

pub fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
}

/// Mixed bag of benign, malicious and malformed inputs.
pub mod urls {
    pub const BENIGN: &[&str] = &[
        "https://www.google.com/search?q=weather",
        "https://github.com/rust-lang/rust",
        "https://en.wikipedia.org/wiki/Phishing",
        "https://docs.rs/serde/latest/serde/",
    ];

    pub const MALICIOUS: &[&str] = &[
        "http://paypal.secure-login.malicious.com/signin",
        "http://192.168.1.1/paypal/login.html",
        "http://paypa1-secure.com/login",
        "http://pаypal.com/login",
        "http://amazon-verify.tk/account",
    ];

    /// Hosts and paths with many distinct non-ASCII characters.
    pub const NON_LATIN: &[&str] = &[
        "http://пример-тестовый-сайт.рф/ёжик/вход?логин=яблоко&пароль=щука",
        "https://例え.テスト/ログイン?ユーザー=太郎",
        "http://ελληνικά.example/σύνδεση",
    ];

    pub const MALFORMED: &[&str] = &["", "   ", "http://", "http://[::1", "%%%", "\u{0}"];
}
