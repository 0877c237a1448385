//! Persisted classifier artifact: feature scaler plus logistic regression.
//!
//! The artifact is JSON so it can be inspected and diffed. Its fingerprint is
//! the SHA-256 of the numeric payload, independent of formatting.

use crate::core::{FEATURE_COUNT, FEATURE_NAMES};
use crate::error::{PhishGuardError, Result};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Current artifact format.
pub const FORMAT_VERSION: u32 = 1;

/// Where a model came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelSource {
    /// Trained at startup on the built-in corpus.
    Bootstrap,
    /// Trained on caller-supplied labeled URLs.
    Trained,
}

/// Per-feature standardization `(x - mean) / scale`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f64>,
    pub scale: Vec<f64>,
}

impl StandardScaler {
    /// Fit on rows of equal width. Zero-variance columns get scale 1.0.
    pub fn fit(rows: &[Vec<f64>]) -> Self {
        let width = rows.first().map_or(0, Vec::len);
        let n = rows.len().max(1) as f64;
        let mut mean = vec![0.0; width];
        for row in rows {
            for (m, v) in mean.iter_mut().zip(row) {
                *m += v;
            }
        }
        mean.iter_mut().for_each(|m| *m /= n);

        let mut var = vec![0.0; width];
        for row in rows {
            for ((s, v), m) in var.iter_mut().zip(row).zip(&mean) {
                *s += (v - m).powi(2);
            }
        }
        let scale = var
            .into_iter()
            .map(|s| {
                let sd = (s / n).sqrt();
                if sd > f64::EPSILON {
                    sd
                } else {
                    1.0
                }
            })
            .collect();
        Self { mean, scale }
    }

    pub fn transform(&self, row: &[f64]) -> Vec<f64> {
        row.iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(v, (m, s))| (v - m) / s)
            .collect()
    }
}

/// Numerically stable logistic function.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

/// Trained logistic-regression artifact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierModel {
    pub format_version: u32,
    pub source: ModelSource,
    pub feature_names: Vec<String>,
    pub scaler: StandardScaler,
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Number of training rows.
    pub samples: usize,
}

#[derive(Serialize)]
struct FingerprintView<'a> {
    feature_names: &'a [String],
    scaler: &'a StandardScaler,
    weights: &'a [f64],
    bias: f64,
}

impl ClassifierModel {
    pub fn new(
        source: ModelSource,
        scaler: StandardScaler,
        weights: Vec<f64>,
        bias: f64,
        samples: usize,
    ) -> Result<Self> {
        let model = Self {
            format_version: FORMAT_VERSION,
            source,
            feature_names: FEATURE_NAMES.iter().map(|s| s.to_string()).collect(),
            scaler,
            weights,
            bias,
            samples,
        };
        model.validate()?;
        Ok(model)
    }

    /// Check the artifact against the current feature projection.
    pub fn validate(&self) -> Result<()> {
        if self.format_version != FORMAT_VERSION {
            return Err(PhishGuardError::ModelArtifact(format!(
                "unsupported format version {} (expected {FORMAT_VERSION})",
                self.format_version
            )));
        }
        for found in [
            self.feature_names.len(),
            self.scaler.mean.len(),
            self.scaler.scale.len(),
            self.weights.len(),
        ] {
            if found != FEATURE_COUNT {
                return Err(PhishGuardError::ModelShape {
                    expected: FEATURE_COUNT,
                    found,
                });
            }
        }
        if let Some((i, _)) = self
            .feature_names
            .iter()
            .zip(FEATURE_NAMES)
            .enumerate()
            .find(|(_, (have, want))| have.as_str() != *want)
        {
            return Err(PhishGuardError::ModelArtifact(format!(
                "feature {i} is '{}', expected '{}'",
                self.feature_names[i], FEATURE_NAMES[i]
            )));
        }
        let numbers = self
            .weights
            .iter()
            .chain(&self.scaler.mean)
            .chain(&self.scaler.scale)
            .chain(std::iter::once(&self.bias));
        if numbers.clone().any(|v| !v.is_finite()) || self.scaler.scale.iter().any(|s| *s == 0.0) {
            return Err(PhishGuardError::ModelArtifact(
                "non-finite parameter or zero scale".into(),
            ));
        }
        Ok(())
    }

    /// Phishing-class probability for one numeric vector.
    pub fn predict_proba(&self, vector: &[f64; FEATURE_COUNT]) -> f64 {
        let scaled = self.scaler.transform(vector);
        let z = scaled
            .iter()
            .zip(&self.weights)
            .map(|(x, w)| x * w)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }

    /// SHA-256 over the numeric payload, hex encoded.
    pub fn fingerprint(&self) -> String {
        let view = FingerprintView {
            feature_names: &self.feature_names,
            scaler: &self.scaler,
            weights: &self.weights,
            bias: self.bias,
        };
        // Serializing plain vectors and floats cannot fail
        let bytes = serde_json::to_vec(&view).unwrap_or_default();
        hex::encode(Sha256::digest(&bytes))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            PhishGuardError::ModelArtifact(format!("{}: {e}", path.display()))
        })?;
        let model: ClassifierModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PhishGuardError::ModelArtifact(format!("{}: {e}", path.display())))?;
        model.validate()?;
        Ok(model)
    }
}
