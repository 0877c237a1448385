//! Ensemble detector: threat-intel gate, then rules, statistical classifier
//! and semantic classifier blended into one [`ScanResult`].
//!
//! Scoring is synchronous and request-local. The only shared mutable state
//! is the injected [`ThreatIntelStore`] and the classifier's swappable model.

use crate::classifier::{StatisticalClassifier, TrainReport};
use crate::config::{EnsembleConfig, ScanConfig};
use crate::core::{
    ComponentDetails, EnsembleWeights, FeatureSet, ScanMetadata, ScanResult, ScanStatus, Severity,
    Verdict,
};
use crate::error::{PhishGuardError, Result};
use crate::features::{normalize::truncate_chars, FeatureExtractor, Target};
use crate::intel::{IntelCheck, ThreatIntelStore};
use crate::rules::RuleEngine;
use crate::semantic::SemanticClassifier;
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::sync::Arc;
use tracing::debug;

pub const REASON_WHITELISTED: &str = "Domain is whitelisted";
pub const REASON_BLACKLISTED: &str = "Domain found in threat intelligence blacklist";
pub const REASON_HIGH_CONFIDENCE: &str = "High confidence phishing detection";
pub const REASON_PHISHING: &str = "Potential phishing detected";
pub const REASON_SAFE: &str = "No significant threats detected";
pub const REASON_SUSPICIOUS: &str = "Some suspicious indicators found";

/// Combined score from which a phishing verdict is reported as high confidence.
const HIGH_CONFIDENCE: f64 = 0.8;

#[derive(Debug, Clone)]
pub struct PhishingDetector {
    config: ScanConfig,
    extractor: FeatureExtractor,
    rules: RuleEngine,
    classifier: StatisticalClassifier,
    semantic: SemanticClassifier,
    intel: Arc<ThreatIntelStore>,
}

impl PhishingDetector {
    /// Build every component from configuration. Model artifacts that fail
    /// to load degrade to their fallbacks; only invalid configuration errors.
    pub fn new(config: ScanConfig, intel: Arc<ThreatIntelStore>) -> Result<Self> {
        config.validate()?;
        let extractor = FeatureExtractor::new(config.extractor.clone());
        let classifier = StatisticalClassifier::load_or_bootstrap(config.classifier.clone(), &extractor);
        let semantic = SemanticClassifier::from_config(config.semantic.clone());
        Self::from_parts(config, intel, classifier, semantic)
    }

    /// Default configuration with an intel store seeded from it.
    pub fn with_defaults() -> Result<Self> {
        let config = ScanConfig::default();
        let intel = Arc::new(ThreatIntelStore::from_config(&config.intel));
        Self::new(config, intel)
    }

    /// Assemble from prebuilt classifiers.
    pub fn from_parts(
        config: ScanConfig,
        intel: Arc<ThreatIntelStore>,
        classifier: StatisticalClassifier,
        semantic: SemanticClassifier,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            extractor: FeatureExtractor::new(config.extractor.clone()),
            rules: RuleEngine::new(config.rules.clone()),
            config,
            classifier,
            semantic,
            intel,
        })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn intel(&self) -> &Arc<ThreatIntelStore> {
        &self.intel
    }

    pub fn classifier(&self) -> &StatisticalClassifier {
        &self.classifier
    }

    pub fn semantic(&self) -> &SemanticClassifier {
        &self.semantic
    }

    pub fn rules(&self) -> &RuleEngine {
        &self.rules
    }

    /// Classify one URL. Never fails.
    pub fn classify(&self, url: &str, metadata: &ScanMetadata) -> ScanResult {
        self.classify_at(url, metadata, Utc::now())
    }

    /// Classify with an explicit timestamp; identical inputs give identical results.
    pub fn classify_at(
        &self,
        url: &str,
        metadata: &ScanMetadata,
        timestamp: DateTime<Utc>,
    ) -> ScanResult {
        let url = truncate_chars(url, self.config.extractor.max_url_length);
        let target = self.extractor.target(url);
        let _span = crate::span_trace!(debug, "classify", host = %target.host).entered();
        let intel = self.intel.check_domain(&target.host);

        if intel.whitelisted || intel.blacklisted {
            return self.short_circuit(url, target, intel, metadata, timestamp);
        }

        let features = self.extractor.extract(url);
        let report = self.rules.evaluate(url, &features);
        let ml = self.classifier.predict(&features);
        let semantic = self.semantic.predict_with_target(
            url,
            &Target {
                host: features.host.clone(),
                domain: features.domain.clone(),
            },
        );

        let e = &self.config.ensemble;
        let weights = EnsembleWeights {
            rule: e.rule_weight,
            ml: e.ml_weight,
            semantic: e.semantic_weight,
        };
        let weighted = report.rule_score * weights.rule
            + ml.probability * weights.ml
            + semantic.score * weights.semantic;
        let (combined, is_phishing) = apply_overrides(
            weighted,
            report.count(Severity::Critical),
            report.count(Severity::High),
            e,
        );
        let combined = round4(combined.clamp(0.0, 1.0));
        let severity = severity_for(combined, e);
        let verdict = if is_phishing {
            Verdict::Malicious
        } else if combined < e.safe_below {
            Verdict::Safe
        } else {
            Verdict::Suspicious
        };
        let reason = match verdict {
            Verdict::Malicious if combined >= HIGH_CONFIDENCE => REASON_HIGH_CONFIDENCE,
            Verdict::Malicious => REASON_PHISHING,
            Verdict::Safe => REASON_SAFE,
            Verdict::Suspicious => REASON_SUSPICIOUS,
        };

        debug!(
            domain = %features.domain,
            rule_score = report.rule_score,
            ml_score = ml.probability,
            semantic_score = semantic.score,
            semantic_mode = ?semantic.mode,
            combined,
            matched = report.matched_rules.len(),
            %verdict,
            "url classified"
        );

        ScanResult {
            url: url.to_string(),
            domain: features.domain.clone(),
            rule_score: report.rule_score,
            ml_score: round4(ml.probability),
            semantic_score: semantic.score,
            combined_score: combined,
            is_phishing,
            severity,
            status: if is_phishing {
                ScanStatus::Blocked
            } else {
                ScanStatus::Active
            },
            verdict,
            reason: reason.to_string(),
            matched_rules: report.matched_rules.clone(),
            details: ComponentDetails {
                intel,
                rules: Some(report),
                ml: Some(ml),
                semantic: Some(semantic),
                weights,
            },
            features: Some(features),
            metadata: metadata.clone(),
            timestamp,
        }
    }

    fn short_circuit(
        &self,
        url: &str,
        target: Target,
        intel: IntelCheck,
        metadata: &ScanMetadata,
        timestamp: DateTime<Utc>,
    ) -> ScanResult {
        let blocked = intel.blacklisted;
        let score = if blocked { 1.0 } else { 0.0 };
        debug!(host = %target.host, blacklisted = blocked, "intel short-circuit");
        let e = &self.config.ensemble;
        ScanResult {
            url: url.to_string(),
            domain: target.domain,
            features: None,
            rule_score: score,
            ml_score: score,
            semantic_score: score,
            combined_score: score,
            is_phishing: blocked,
            severity: if blocked {
                Severity::Critical
            } else {
                Severity::Info
            },
            status: if blocked {
                ScanStatus::Blocked
            } else {
                ScanStatus::Active
            },
            verdict: if blocked {
                Verdict::Malicious
            } else {
                Verdict::Safe
            },
            reason: if blocked {
                REASON_BLACKLISTED
            } else {
                REASON_WHITELISTED
            }
            .to_string(),
            matched_rules: Vec::new(),
            details: ComponentDetails {
                intel,
                rules: None,
                ml: None,
                semantic: None,
                weights: EnsembleWeights {
                    rule: e.rule_weight,
                    ml: e.ml_weight,
                    semantic: e.semantic_weight,
                },
            },
            metadata: metadata.clone(),
            timestamp,
        }
    }

    /// Classify a batch in parallel; output order follows input order.
    pub fn classify_many<S>(&self, urls: &[S], metadata: &ScanMetadata) -> Vec<ScanResult>
    where
        S: AsRef<str> + Sync,
    {
        urls.par_iter()
            .map(|u| self.classify(u.as_ref(), metadata))
            .collect()
    }

    /// Retrain the statistical classifier on labeled URLs.
    pub fn train<S: AsRef<str>>(&self, urls: &[S], labels: &[bool]) -> Result<TrainReport> {
        if urls.len() != labels.len() {
            return Err(PhishGuardError::Training(format!(
                "{} urls but {} labels",
                urls.len(),
                labels.len()
            )));
        }
        let features: Vec<FeatureSet> = urls
            .iter()
            .map(|u| self.extractor.extract(u.as_ref()))
            .collect();
        self.classifier.train(&features, labels)
    }
}

/// Apply the rule-severity floors. Returns the adjusted score and the
/// phishing decision.
pub fn apply_overrides(
    combined: f64,
    critical: usize,
    high: usize,
    e: &EnsembleConfig,
) -> (f64, bool) {
    if critical > 0 {
        (combined.max(e.critical_floor), true)
    } else if high >= 2 {
        (combined.max(e.multi_high_floor), true)
    } else if high == 1 {
        let c = combined.max(e.single_high_floor);
        (c, c >= e.phishing_threshold)
    } else {
        (combined, combined >= e.phishing_threshold)
    }
}

/// Map a combined score onto the severity tiers.
pub fn severity_for(combined: f64, e: &EnsembleConfig) -> Severity {
    let t = &e.severity_cutoffs;
    if combined >= t.critical {
        Severity::Critical
    } else if combined >= t.high {
        Severity::High
    } else if combined >= t.medium {
        Severity::Medium
    } else if combined >= t.low {
        Severity::Low
    } else {
        Severity::Info
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}
