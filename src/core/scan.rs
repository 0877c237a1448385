//! Scan result types handed to the caller.

use super::features::FeatureSet;
use super::severity::{ScanStatus, Severity, Verdict};
use crate::classifier::MlPrediction;
use crate::error::Result;
use crate::intel::IntelCheck;
use crate::rules::{RuleId, RuleReport};
use crate::semantic::SemanticPrediction;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Optional request context supplied by the routing layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanMetadata {
    pub caller_id: Option<String>,
    pub source_address: Option<String>,
    pub user_agent: Option<String>,
}

/// A rule that fired, with its contribution and explanation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchedRule {
    pub id: RuleId,
    pub name: String,
    pub severity: Severity,
    pub weight: f64,
    pub reason: String,
}

/// Weights used to blend the component scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnsembleWeights {
    pub rule: f64,
    pub ml: f64,
    pub semantic: f64,
}

/// Per-component outputs kept for explainability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentDetails {
    pub intel: IntelCheck,
    pub rules: Option<RuleReport>,
    pub ml: Option<MlPrediction>,
    pub semantic: Option<SemanticPrediction>,
    pub weights: EnsembleWeights,
}

/// Outcome of one `classify` call. Never mutated after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanResult {
    pub url: String,
    pub domain: String,
    /// `None` when threat intelligence short-circuited the scan.
    pub features: Option<FeatureSet>,
    pub rule_score: f64,
    pub ml_score: f64,
    pub semantic_score: f64,
    pub combined_score: f64,
    pub is_phishing: bool,
    pub severity: Severity,
    pub status: ScanStatus,
    pub verdict: Verdict,
    pub reason: String,
    pub matched_rules: Vec<MatchedRule>,
    pub details: ComponentDetails,
    pub metadata: ScanMetadata,
    pub timestamp: DateTime<Utc>,
}

impl ScanResult {
    /// Serialize for the persistence collaborator.
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        Ok(serde_json::from_str(s)?)
    }

    /// High and critical results are worth an alert.
    pub fn should_alert(&self) -> bool {
        self.severity >= Severity::High
    }

    /// True when a rule with the given id fired.
    pub fn has_rule(&self, id: RuleId) -> bool {
        self.matched_rules.iter().any(|r| r.id == id)
    }
}
