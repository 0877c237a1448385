//! Statistical classifier over the numeric feature projection.
//!
//! A [`ClassifierModel`] is loaded once from JSON or, when that fails,
//! bootstrapped from the built-in corpus so prediction is always available.
//! The active model sits behind `RwLock<Arc<_>>`: readers clone the `Arc`
//! and score without holding the lock, and [`StatisticalClassifier::swap`]
//! replaces it in one step.

pub mod bootstrap;
pub mod model;

use crate::config::ClassifierConfig;
use crate::core::{FeatureSet, FEATURE_NAMES};
use crate::error::{PhishGuardError, Result};
use crate::features::FeatureExtractor;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{info, warn};

pub use model::{ClassifierModel, ModelSource, StandardScaler, FORMAT_VERSION};

/// Registrable domains whose probability is dampened regardless of the model.
pub static DAMPENED_DOMAINS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "google.com", "youtube.com", "facebook.com", "amazon.com", "microsoft.com",
        "apple.com", "github.com", "linkedin.com", "twitter.com", "x.com",
        "instagram.com", "netflix.com", "paypal.com", "wikipedia.org", "reddit.com",
        "stackoverflow.com", "yahoo.com", "bing.com", "live.com", "office.com",
        "outlook.com", "dropbox.com", "adobe.com", "zoom.us", "slack.com",
        "spotify.com", "ebay.com", "walmart.com", "chase.com", "bankofamerica.com",
        "wellsfargo.com", "icloud.com",
    ]
    .into_iter()
    .collect()
});

/// One input feature and its model coefficient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub name: String,
    pub weight: f64,
}

/// Output of [`StatisticalClassifier::predict`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MlPrediction {
    /// Phishing-class probability after dampening.
    pub probability: f64,
    /// Probability of the predicted class.
    pub confidence: f64,
    pub is_phishing: bool,
    pub threshold: f64,
    /// Largest coefficients by magnitude.
    pub top_features: Vec<FeatureWeight>,
    /// Set when the known-legitimate dampening applied.
    pub dampened: bool,
}

/// Summary of the active artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub source: ModelSource,
    pub format_version: u32,
    pub feature_count: usize,
    pub samples: usize,
    pub fingerprint: String,
}

impl From<&ClassifierModel> for ModelInfo {
    fn from(m: &ClassifierModel) -> Self {
        Self {
            source: m.source,
            format_version: m.format_version,
            feature_count: m.feature_names.len(),
            samples: m.samples,
            fingerprint: m.fingerprint(),
        }
    }
}

/// Accuracy of a caller-initiated training run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainReport {
    pub train_accuracy: f64,
    /// `None` when the data set was too small to hold out a test split.
    pub test_accuracy: Option<f64>,
    pub train_samples: usize,
    pub test_samples: usize,
    pub model: ModelInfo,
}

/// Share of labeled rows held out when training on caller data.
const TEST_SHARE: f64 = 0.2;

#[derive(Debug, Clone)]
pub struct StatisticalClassifier {
    model: Arc<RwLock<Arc<ClassifierModel>>>,
    config: ClassifierConfig,
}

impl StatisticalClassifier {
    pub fn new(model: ClassifierModel, config: ClassifierConfig) -> Self {
        Self {
            model: Arc::new(RwLock::new(Arc::new(model))),
            config,
        }
    }

    /// Load `config.model_path`, falling back to the bootstrap model.
    pub fn load_or_bootstrap(config: ClassifierConfig, extractor: &FeatureExtractor) -> Self {
        if let Some(path) = &config.model_path {
            match ClassifierModel::load(path) {
                Ok(model) => {
                    info!(path = %path.display(), fingerprint = %model.fingerprint(), "loaded classifier model");
                    return Self::new(model, config);
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "classifier model unavailable; bootstrapping");
                }
            }
        }
        Self::bootstrap(config, extractor)
    }

    /// Train the fallback model from the built-in corpus.
    pub fn bootstrap(config: ClassifierConfig, extractor: &FeatureExtractor) -> Self {
        match bootstrap::bootstrap_model(extractor, &config.bootstrap) {
            Ok(model) => {
                info!(
                    samples = model.samples,
                    fingerprint = %model.fingerprint(),
                    "bootstrapped classifier model"
                );
                Self::new(model, config)
            }
            Err(e) => {
                // Only reachable with a degenerate bootstrap config
                warn!(error = %e, "bootstrap failed; using neutral model");
                Self::new(neutral_model(), config)
            }
        }
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Snapshot of the active model.
    pub fn current(&self) -> Arc<ClassifierModel> {
        self.model
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the active model after validating it. Returns the previous one.
    pub fn swap(&self, model: ClassifierModel) -> Result<Arc<ClassifierModel>> {
        model.validate()?;
        let mut guard = self.model.write().unwrap_or_else(PoisonError::into_inner);
        Ok(std::mem::replace(&mut *guard, Arc::new(model)))
    }

    /// Load an artifact and swap it in; the current model stays on failure.
    pub fn reload<P: AsRef<Path>>(&self, path: P) -> Result<ModelInfo> {
        let path = path.as_ref();
        let _span = crate::span_trace!("model_reload", path = %path.display()).entered();
        let model = ClassifierModel::load(path).inspect_err(|e| {
            warn!(path = %path.display(), error = %e, "model reload failed; keeping current model");
        })?;
        let info = ModelInfo::from(&model);
        self.swap(model)?;
        info!(path = %path.display(), fingerprint = %info.fingerprint, "classifier model reloaded");
        Ok(info)
    }

    pub fn model_info(&self) -> ModelInfo {
        ModelInfo::from(self.current().as_ref())
    }

    /// Fit a new model on labeled feature sets and make it active.
    pub fn train(&self, features: &[FeatureSet], labels: &[bool]) -> Result<TrainReport> {
        if features.len() != labels.len() {
            return Err(PhishGuardError::Training(format!(
                "{} urls but {} labels",
                features.len(),
                labels.len()
            )));
        }
        let rows = features.iter().map(FeatureSet::numeric_vector).collect();
        let seed = self.config.bootstrap.seed;
        let ((train_x, train_y), (test_x, test_y)) =
            bootstrap::split(rows, labels.to_vec(), TEST_SHARE, seed);

        let model = bootstrap::fit(&train_x, &train_y, &self.config.bootstrap, ModelSource::Trained)?;
        let threshold = self.config.threshold;
        let report = TrainReport {
            train_accuracy: bootstrap::accuracy(&model, &train_x, &train_y, threshold),
            test_accuracy: (!test_x.is_empty())
                .then(|| bootstrap::accuracy(&model, &test_x, &test_y, threshold)),
            train_samples: train_x.len(),
            test_samples: test_x.len(),
            model: ModelInfo::from(&model),
        };
        self.swap(model)?;
        info!(
            train_accuracy = report.train_accuracy,
            test_accuracy = ?report.test_accuracy,
            samples = report.train_samples,
            "classifier retrained"
        );
        Ok(report)
    }

    /// Score one feature set.
    pub fn predict(&self, features: &FeatureSet) -> MlPrediction {
        let model = self.current();
        let raw = model.predict_proba(&features.numeric_vector());

        let dampened = is_dampened(features);
        let probability = if dampened {
            (raw * self.config.legit_dampening).min(self.config.legit_cap)
        } else {
            raw
        };

        MlPrediction {
            probability,
            confidence: probability.max(1.0 - probability),
            is_phishing: probability >= self.config.threshold,
            threshold: self.config.threshold,
            top_features: top_features(&model, self.config.top_features),
            dampened,
        }
    }
}

fn is_dampened(features: &FeatureSet) -> bool {
    !features.domain.is_empty()
        && (DAMPENED_DOMAINS.contains(features.domain.as_str())
            || DAMPENED_DOMAINS.contains(features.full_domain().as_str()))
}

fn top_features(model: &ClassifierModel, n: usize) -> Vec<FeatureWeight> {
    let mut ranked: Vec<(usize, f64)> = model.weights.iter().copied().enumerate().collect();
    ranked.sort_by(|a, b| b.1.abs().total_cmp(&a.1.abs()).then(a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(n)
        .map(|(i, w)| FeatureWeight {
            name: FEATURE_NAMES[i].to_string(),
            weight: (w * 10_000.0).round() / 10_000.0,
        })
        .collect()
}

/// All-zero model predicting 0.5 everywhere.
fn neutral_model() -> ClassifierModel {
    let width = FEATURE_NAMES.len();
    ClassifierModel {
        format_version: FORMAT_VERSION,
        source: ModelSource::Bootstrap,
        feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
        scaler: StandardScaler {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        },
        weights: vec![0.0; width],
        bias: 0.0,
        samples: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BootstrapConfig;
    use crate::features::extract;

    fn quick_config() -> ClassifierConfig {
        ClassifierConfig {
            bootstrap: BootstrapConfig {
                synthetic_samples: 200,
                epochs: 100,
                ..BootstrapConfig::default()
            },
            ..ClassifierConfig::default()
        }
    }

    fn classifier() -> StatisticalClassifier {
        StatisticalClassifier::bootstrap(quick_config(), &FeatureExtractor::default())
    }

    #[test]
    fn separates_obvious_cases() {
        let c = classifier();
        let phish = c.predict(&extract(
            "http://secure-paypal-account-verification-update-login-confirm.com/signin?user=1&next=2",
        ));
        let legit = c.predict(&extract("https://docs.rs/serde"));
        assert!(phish.probability > legit.probability);
        assert!(phish.is_phishing);
        assert!(phish.confidence >= 0.5);
    }

    #[test]
    fn known_domains_are_dampened() {
        let c = classifier();
        let p = c.predict(&extract("http://www.paypal.com/signin-verify-account-update"));
        assert!(p.dampened);
        assert!(p.probability <= 0.15);
        assert!(!p.is_phishing);
    }

    #[test]
    fn top_features_are_ranked() {
        let p = classifier().predict(&extract("https://example.org/"));
        assert_eq!(p.top_features.len(), 5);
        let mags: Vec<f64> = p.top_features.iter().map(|f| f.weight.abs()).collect();
        assert!(mags.windows(2).all(|w| w[0] >= w[1]));
    }

    #[test]
    fn missing_artifact_falls_back_to_bootstrap() {
        let cfg = ClassifierConfig {
            model_path: Some("/nonexistent/model.json".into()),
            ..quick_config()
        };
        let c = StatisticalClassifier::load_or_bootstrap(cfg, &FeatureExtractor::default());
        assert_eq!(c.model_info().source, ModelSource::Bootstrap);
    }

    #[test]
    fn reload_swaps_and_failure_keeps_model() {
        let c = classifier();
        let before = c.model_info().fingerprint;

        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("model.json");
        let mut m = (*c.current()).clone();
        m.bias += 1.0;
        m.save(&good).unwrap();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "[]").unwrap();
        assert!(c.reload(&bad).is_err());
        assert_eq!(c.model_info().fingerprint, before);

        let info = c.reload(&good).unwrap();
        assert_ne!(info.fingerprint, before);
        assert_eq!(c.model_info().fingerprint, info.fingerprint);
    }

    #[test]
    fn swap_rejects_bad_shape() {
        let c = classifier();
        let mut m = (*c.current()).clone();
        m.weights.truncate(3);
        assert!(matches!(c.swap(m), Err(PhishGuardError::ModelShape { .. })));
    }

    #[test]
    fn train_on_labeled_urls() {
        let c = classifier();
        let ex = FeatureExtractor::default();
        let urls = bootstrap::LEGITIMATE_URLS.iter().chain(bootstrap::PHISHING_URLS);
        let labels: Vec<bool> = bootstrap::LEGITIMATE_URLS
            .iter()
            .map(|_| false)
            .chain(bootstrap::PHISHING_URLS.iter().map(|_| true))
            .collect();
        let features: Vec<FeatureSet> = urls.map(|u| ex.extract(u)).collect();

        let report = c.train(&features, &labels).unwrap();
        assert!(report.train_accuracy > 0.8);
        assert!(report.test_accuracy.is_some());
        assert_eq!(report.train_samples + report.test_samples, labels.len());
        assert_eq!(c.model_info().source, ModelSource::Trained);

        assert!(c.train(&features[..2], &labels[..1]).is_err());
    }

    #[test]
    fn neutral_model_validates() {
        neutral_model().validate().unwrap();
    }
}
