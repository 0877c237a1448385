//! Core data types shared across the scoring components.

pub mod features;
pub mod scan;
pub mod severity;

pub use features::{FeatureSet, HomographHit, ObfuscationFlags, FEATURE_COUNT, FEATURE_NAMES};
pub use scan::{ComponentDetails, EnsembleWeights, MatchedRule, ScanMetadata, ScanResult};
pub use severity::{ScanStatus, Severity, Verdict};
