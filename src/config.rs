//! Configuration for the scoring engine.
//!
//! Provides centralized configuration for every component with the
//! production defaults. All thresholds and weights are tunable; sections
//! missing from a JSON file fall back to their defaults.

use crate::error::{PhishGuardError, Result};
use crate::rules::RuleId;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Master configuration for the scoring pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Feature extraction bounds and thresholds.
    pub extractor: ExtractorConfig,
    /// Rule engine aggregation policy.
    pub rules: RuleConfig,
    /// Statistical classifier artifact and dampening.
    pub classifier: ClassifierConfig,
    /// Pattern/semantic classifier.
    pub semantic: SemanticConfig,
    /// Ensemble weights and override policy.
    pub ensemble: EnsembleConfig,
    /// Threat intelligence seeding.
    pub intel: IntelConfig,
}

impl ScanConfig {
    /// Parse a configuration from JSON and validate it.
    pub fn from_json_str(s: &str) -> Result<Self> {
        let cfg: ScanConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Load a JSON configuration file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Check cross-field invariants.
    pub fn validate(&self) -> Result<()> {
        let e = &self.ensemble;
        let sum = e.rule_weight + e.ml_weight + e.semantic_weight;
        if (sum - 1.0).abs() > 1e-6 {
            return Err(PhishGuardError::Config(format!(
                "ensemble weights must sum to 1.0 (got {sum:.6})"
            )));
        }
        for (name, v) in [
            ("ensemble.rule_weight", e.rule_weight),
            ("ensemble.ml_weight", e.ml_weight),
            ("ensemble.semantic_weight", e.semantic_weight),
            ("ensemble.phishing_threshold", e.phishing_threshold),
            ("ensemble.critical_floor", e.critical_floor),
            ("ensemble.multi_high_floor", e.multi_high_floor),
            ("ensemble.single_high_floor", e.single_high_floor),
            ("classifier.threshold", self.classifier.threshold),
            ("classifier.legit_dampening", self.classifier.legit_dampening),
            ("classifier.legit_cap", self.classifier.legit_cap),
            ("semantic.primary_weight", self.semantic.primary_weight),
            ("extractor.typosquat_threshold", self.extractor.typosquat_threshold),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(PhishGuardError::Config(format!(
                    "{name} must be within [0, 1] (got {v})"
                )));
            }
        }
        let t = &e.severity_cutoffs;
        if !(t.critical >= t.high && t.high >= t.medium && t.medium >= t.low) {
            return Err(PhishGuardError::Config(
                "severity cutoffs must be non-increasing from critical to low".into(),
            ));
        }
        if self.extractor.max_url_length == 0 {
            return Err(PhishGuardError::Config(
                "extractor.max_url_length must be positive".into(),
            ));
        }
        Ok(())
    }
}

/// Feature extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractorConfig {
    /// Maximum characters analysed per URL (default: 8192).
    pub max_url_length: usize,
    /// Subdomain label count above which subdomains are excessive (default: 3).
    pub excessive_subdomain_count: usize,
    /// Registrable domain length above which it is "long" (default: 25).
    pub long_domain_length: usize,
    /// Maximum edit distance for a typosquatting candidate (default: 2).
    pub typosquat_max_distance: usize,
    /// Minimum brand length for edit-distance matching (default: 4).
    pub typosquat_min_length: usize,
    /// Similarity above which a domain is flagged as typosquatting (default: 0.7).
    pub typosquat_threshold: f64,
    /// Minimum run length of base64-alphabet characters (default: 24).
    pub base64_min_run: usize,
    /// Longest token considered by edit-distance comparisons (default: 64).
    pub max_token_length: usize,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            max_url_length: 8192,
            excessive_subdomain_count: 3,
            long_domain_length: 25,
            typosquat_max_distance: 2,
            typosquat_min_length: 4,
            typosquat_threshold: 0.7,
            base64_min_run: 24,
            max_token_length: 64,
        }
    }
}

/// Tiered aggregation policy for the rule engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuleConfig {
    /// Base score per dominant tier.
    pub tiers: TierScores,
    /// Bonus added when matches span two or more severities (default: 0.10).
    pub mixed_severity_bonus: f64,
    /// Rules excluded from evaluation.
    pub disabled: Vec<RuleId>,
    /// URL length that is suspicious together with other indicators (default: 150).
    pub long_url_threshold: usize,
    /// URL length that is suspicious on its own (default: 200).
    pub very_long_url_threshold: usize,
    /// URL entropy threshold for short URLs (default: 4.8).
    pub high_entropy_threshold: f64,
    /// URL entropy threshold regardless of length (default: 5.2).
    pub very_high_entropy_threshold: f64,
}

impl Default for RuleConfig {
    fn default() -> Self {
        Self {
            tiers: TierScores::default(),
            mixed_severity_bonus: 0.10,
            disabled: Vec::new(),
            long_url_threshold: 150,
            very_long_url_threshold: 200,
            high_entropy_threshold: 4.8,
            very_high_entropy_threshold: 5.2,
        }
    }
}

/// Base score, per-extra-match increment and cap for each severity tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierScores {
    pub critical: TierScore,
    pub high: TierScore,
    pub medium: TierScore,
    pub low: TierScore,
}

impl Default for TierScores {
    fn default() -> Self {
        Self {
            critical: TierScore::new(0.85, 0.05, 1.0),
            high: TierScore::new(0.60, 0.10, 0.85),
            medium: TierScore::new(0.30, 0.10, 0.60),
            low: TierScore::new(0.10, 0.05, 0.30),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TierScore {
    pub base: f64,
    pub increment: f64,
    pub cap: f64,
}

impl TierScore {
    pub const fn new(base: f64, increment: f64, cap: f64) -> Self {
        Self {
            base,
            increment,
            cap,
        }
    }
}

/// Statistical classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Persisted model artifact; bootstrap is used when absent or unreadable.
    pub model_path: Option<PathBuf>,
    /// Probability at which the classifier alone calls a URL phishing (default: 0.5).
    pub threshold: f64,
    /// Multiplier applied for known-legitimate domains (default: 0.1).
    pub legit_dampening: f64,
    /// Upper bound after dampening (default: 0.15).
    pub legit_cap: f64,
    /// Number of features reported for explainability (default: 5).
    pub top_features: usize,
    /// Bootstrap corpus parameters.
    pub bootstrap: BootstrapConfig,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            threshold: 0.5,
            legit_dampening: 0.1,
            legit_cap: 0.15,
            top_features: 5,
            bootstrap: BootstrapConfig::default(),
        }
    }
}

/// Parameters for training the fallback model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// RNG seed for the synthetic vectors (default: 42).
    pub seed: u64,
    /// Number of synthetic vectors, split evenly across classes (default: 1000).
    pub synthetic_samples: usize,
    /// Gradient descent epochs (default: 300).
    pub epochs: usize,
    /// Learning rate (default: 0.5).
    pub learning_rate: f64,
    /// L2 regularisation strength (default: 0.001).
    pub l2: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            synthetic_samples: 1000,
            epochs: 300,
            learning_rate: 0.5,
            l2: 0.001,
        }
    }
}

/// Pattern/semantic classifier configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SemanticConfig {
    /// Optional sequence-model artifact enabling hybrid mode.
    pub model_path: Option<PathBuf>,
    /// Weight of the sequence model in hybrid mode (default: 0.7).
    pub primary_weight: f64,
    /// Score returned for known-safe URLs (default: 0.05).
    pub safe_score: f64,
    /// Multiplier for the token pass contribution (default: 0.5).
    pub token_weight: f64,
    /// Number of tokens echoed in the result (default: 10).
    pub max_reported_tokens: usize,
}

impl Default for SemanticConfig {
    fn default() -> Self {
        Self {
            model_path: None,
            primary_weight: 0.7,
            safe_score: 0.05,
            token_weight: 0.5,
            max_reported_tokens: 10,
        }
    }
}

/// Ensemble weights and override policy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnsembleConfig {
    pub rule_weight: f64,
    pub ml_weight: f64,
    pub semantic_weight: f64,
    /// Base phishing threshold on the combined score (default: 0.5).
    pub phishing_threshold: f64,
    /// Floor forced by any critical rule (default: 0.85).
    pub critical_floor: f64,
    /// Floor forced by two or more high rules (default: 0.65).
    pub multi_high_floor: f64,
    /// Floor forced by exactly one high rule (default: 0.55).
    pub single_high_floor: f64,
    /// Combined score below which a non-phishing URL is "safe" (default: 0.2).
    pub safe_below: f64,
    pub severity_cutoffs: SeverityCutoffs,
}

impl Default for EnsembleConfig {
    fn default() -> Self {
        Self {
            rule_weight: 0.35,
            ml_weight: 0.25,
            semantic_weight: 0.40,
            phishing_threshold: 0.5,
            critical_floor: 0.85,
            multi_high_floor: 0.65,
            single_high_floor: 0.55,
            safe_below: 0.2,
            severity_cutoffs: SeverityCutoffs::default(),
        }
    }
}

/// Combined-score cutoffs for the final severity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeverityCutoffs {
    pub critical: f64,
    pub high: f64,
    pub medium: f64,
    pub low: f64,
}

impl Default for SeverityCutoffs {
    fn default() -> Self {
        Self {
            critical: 0.8,
            high: 0.6,
            medium: 0.4,
            low: 0.2,
        }
    }
}

/// Threat intelligence seeding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntelConfig {
    /// Seed the whitelist with the built-in safe-list (default: true).
    pub seed_default_whitelist: bool,
    /// Optional newline-delimited feed file merged into the blacklist at startup.
    pub feed_path: Option<PathBuf>,
}

impl Default for IntelConfig {
    fn default() -> Self {
        Self {
            seed_default_whitelist: true,
            feed_path: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        ScanConfig::default().validate().unwrap();
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ScanConfig::from_json_str(
            r#"{"ensemble": {"rule_weight": 0.5, "ml_weight": 0.2, "semantic_weight": 0.3}}"#,
        )
        .unwrap();
        assert_eq!(cfg.ensemble.rule_weight, 0.5);
        assert_eq!(cfg.ensemble.critical_floor, 0.85);
        assert_eq!(cfg.extractor.max_url_length, 8192);
    }

    #[test]
    fn weights_must_sum_to_one() {
        let err = ScanConfig::from_json_str(r#"{"ensemble": {"rule_weight": 0.9}}"#).unwrap_err();
        assert!(matches!(err, PhishGuardError::Config(_)));
    }

    #[test]
    fn disabled_rules_round_trip() {
        let mut cfg = ScanConfig::default();
        cfg.rules.disabled = vec![RuleId::UrlShortener];
        let json = serde_json::to_string(&cfg).unwrap();
        let back = ScanConfig::from_json_str(&json).unwrap();
        assert_eq!(back, cfg);
    }
}
