//! Pattern/semantic classifier.
//!
//! Always has a deterministic fallback (weighted pattern table plus a token
//! pass). When a [`SequenceModel`] is available the classifier runs in
//! hybrid mode and blends the model score with the pattern score.

pub mod ngram;
pub mod patterns;
pub mod tokens;

use crate::config::SemanticConfig;
use crate::features::{normalize::truncate_chars, FeatureExtractor, Target};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{info, warn};

pub use ngram::{CharNgramModel, NgramParams};

/// Characters of a URL scored by the pattern table.
const MAX_SCORED_CHARS: usize = 8192;

/// A learned scorer over raw URL text.
pub trait SequenceModel: Send + Sync + fmt::Debug {
    fn name(&self) -> &str;

    /// Phishing probability in [0, 1].
    fn score(&self, url: &str) -> f64;
}

/// Which path produced a semantic score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticMode {
    /// Pattern table and token pass only.
    Pattern,
    /// Sequence model blended with the pattern table.
    Hybrid,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticPrediction {
    pub score: f64,
    pub mode: SemanticMode,
    /// Pattern table score before the token pass.
    pub pattern_score: f64,
    /// Unscaled token pass score.
    pub token_score: f64,
    pub primary_score: Option<f64>,
    pub matched_patterns: Vec<String>,
    /// Leading tokens of the URL.
    pub tokens: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemanticModelInfo {
    pub mode: SemanticMode,
    pub primary: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SemanticClassifier {
    primary: Option<Arc<dyn SequenceModel>>,
    config: SemanticConfig,
}

impl Default for SemanticClassifier {
    fn default() -> Self {
        Self::pattern_only(SemanticConfig::default())
    }
}

impl SemanticClassifier {
    pub fn pattern_only(config: SemanticConfig) -> Self {
        Self {
            primary: None,
            config,
        }
    }

    pub fn with_model(config: SemanticConfig, model: Arc<dyn SequenceModel>) -> Self {
        Self {
            primary: Some(model),
            config,
        }
    }

    /// Hybrid when `config.model_path` loads, pattern-only otherwise.
    pub fn from_config(config: SemanticConfig) -> Self {
        let Some(path) = config.model_path.clone() else {
            return Self::pattern_only(config);
        };
        match CharNgramModel::load(&path) {
            Ok(model) => {
                info!(path = %path.display(), "loaded sequence model; semantic mode is hybrid");
                Self::with_model(config, Arc::new(model))
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "sequence model unavailable; using pattern mode");
                Self::pattern_only(config)
            }
        }
    }

    pub fn mode(&self) -> SemanticMode {
        if self.primary.is_some() {
            SemanticMode::Hybrid
        } else {
            SemanticMode::Pattern
        }
    }

    pub fn model_info(&self) -> SemanticModelInfo {
        SemanticModelInfo {
            mode: self.mode(),
            primary: self.primary.as_ref().map(|m| m.name().to_string()),
        }
    }

    /// Score a URL, resolving its host first.
    pub fn predict(&self, url: &str) -> SemanticPrediction {
        let target = FeatureExtractor::default().target(url);
        self.predict_with_target(url, &target)
    }

    /// Score a URL whose host and registrable domain are already known.
    pub fn predict_with_target(&self, url: &str, target: &Target) -> SemanticPrediction {
        let bounded = truncate_chars(url, MAX_SCORED_CHARS);
        let lower = bounded.to_lowercase();
        let label = target.domain.split('.').next().unwrap_or("");

        let pattern = patterns::score(&lower, &target.host, label, self.config.safe_score);
        let token = if pattern.safe {
            tokens::TokenOutcome {
                tokens: tokens::tokenize(bounded),
                ..Default::default()
            }
        } else {
            tokens::analyze(bounded, label)
        };

        let mut matched_patterns = pattern.matched;
        let tokens: Vec<String> = token
            .tokens
            .into_iter()
            .take(self.config.max_reported_tokens)
            .collect();

        let (score, primary_score) = match &self.primary {
            Some(model) => {
                let p = model.score(bounded).clamp(0.0, 1.0);
                let w = self.config.primary_weight;
                (p * w + pattern.score * (1.0 - w), Some(p))
            }
            None => {
                matched_patterns.extend(token.findings);
                let s = if pattern.safe {
                    pattern.score
                } else {
                    (pattern.score + token.score * self.config.token_weight).min(1.0)
                };
                (s, None)
            }
        };

        SemanticPrediction {
            score: round4(score),
            mode: self.mode(),
            pattern_score: round4(pattern.score),
            token_score: round4(token.score),
            primary_score: primary_score.map(round4),
            matched_patterns,
            tokens,
        }
    }
}

fn round4(v: f64) -> f64 {
    (v * 10_000.0).round() / 10_000.0
}
