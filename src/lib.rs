//! Phishing URL scoring engine.
//!
//! A URL passes a threat-intelligence gate, then three independent scorers
//! (heuristic rules, a statistical classifier over lexical features, and a
//! pattern/semantic classifier) whose outputs are blended into a
//! [`ScanResult`] with severity, verdict and per-component explanations.

/// Statistical classifier and its model artifact
pub mod classifier;
/// Configuration with production defaults
pub mod config;
/// Core data types
pub mod core;
/// Ensemble detector
pub mod detector;
/// Shannon entropy
pub mod entropy;
/// Error types
pub mod error;
/// URL feature extraction
pub mod features;
/// Threat intelligence store and feeds
pub mod intel;
/// Logging and tracing setup
pub mod logging;
/// Heuristic rule engine
pub mod rules;
/// Pattern/semantic classifier
pub mod semantic;
/// Brand look-alike comparisons
pub mod similarity;

pub use crate::classifier::{MlPrediction, ModelInfo, StatisticalClassifier, TrainReport};
pub use crate::config::ScanConfig;
pub use crate::core::{
    FeatureSet, MatchedRule, ScanMetadata, ScanResult, ScanStatus, Severity, Verdict,
};
pub use crate::detector::PhishingDetector;
pub use crate::error::{PhishGuardError, Result};
pub use crate::features::{extract, FeatureExtractor};
pub use crate::intel::{ListKind, ThreatIntelStore};
pub use crate::rules::{RuleEngine, RuleId};
pub use crate::semantic::{SemanticClassifier, SemanticMode, SequenceModel};
