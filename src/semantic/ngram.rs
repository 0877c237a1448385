//! Hashed character n-gram logistic model used as the sequence scorer.
//!
//! Each URL becomes a bag of hashed n-grams (FNV-1a into `buckets` slots,
//! weighted by relative frequency); the score is a logistic function of the
//! weighted sum. Artifacts are JSON.

use super::SequenceModel;
use crate::classifier::model::sigmoid;
use crate::error::{PhishGuardError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

pub const NGRAM_FORMAT_VERSION: u32 = 1;

/// Characters of a URL the model looks at.
const MAX_MODEL_CHARS: usize = 512;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

fn fnv1a(bytes: &[u8]) -> u64 {
    bytes
        .iter()
        .fold(FNV_OFFSET, |h, b| (h ^ u64::from(*b)).wrapping_mul(FNV_PRIME))
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CharNgramModel {
    pub format_version: u32,
    /// N-gram width in characters.
    pub n: usize,
    pub buckets: usize,
    pub weights: Vec<f64>,
    pub bias: f64,
}

/// Training parameters for [`CharNgramModel::fit`].
#[derive(Debug, Clone, Copy)]
pub struct NgramParams {
    pub n: usize,
    pub buckets: usize,
    pub epochs: usize,
    pub learning_rate: f64,
}

impl Default for NgramParams {
    fn default() -> Self {
        Self {
            n: 3,
            buckets: 4096,
            epochs: 200,
            learning_rate: 2.0,
        }
    }
}

impl CharNgramModel {
    pub fn validate(&self) -> Result<()> {
        if self.format_version != NGRAM_FORMAT_VERSION {
            return Err(PhishGuardError::ModelArtifact(format!(
                "unsupported n-gram format version {}",
                self.format_version
            )));
        }
        if !(1..=8).contains(&self.n) || self.buckets == 0 {
            return Err(PhishGuardError::ModelArtifact(format!(
                "invalid n-gram geometry n={} buckets={}",
                self.n, self.buckets
            )));
        }
        if self.weights.len() != self.buckets {
            return Err(PhishGuardError::ModelShape {
                expected: self.buckets,
                found: self.weights.len(),
            });
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(PhishGuardError::ModelArtifact("non-finite weight".into()));
        }
        Ok(())
    }

    /// Sparse relative-frequency vector of hashed n-grams.
    fn encode(&self, url: &str) -> Vec<(usize, f64)> {
        let mut padded: Vec<char> = Vec::with_capacity(MAX_MODEL_CHARS + 2);
        padded.push('^');
        padded.extend(url.chars().take(MAX_MODEL_CHARS).flat_map(char::to_lowercase));
        padded.push('$');

        let mut counts: BTreeMap<usize, f64> = BTreeMap::new();
        let mut buf = String::new();
        for window in padded.windows(self.n) {
            buf.clear();
            buf.extend(window);
            let slot = (fnv1a(buf.as_bytes()) % self.buckets as u64) as usize;
            *counts.entry(slot).or_insert(0.0) += 1.0;
        }
        let total: f64 = counts.values().sum();
        if total == 0.0 {
            return Vec::new();
        }
        counts.into_iter().map(|(k, v)| (k, v / total)).collect()
    }

    fn logit(&self, x: &[(usize, f64)]) -> f64 {
        x.iter().map(|(i, v)| self.weights[*i] * v).sum::<f64>() + self.bias
    }

    /// Fit on labeled URLs with full-batch gradient descent.
    pub fn fit(samples: &[(&str, bool)], params: NgramParams) -> Result<Self> {
        if !samples.iter().any(|(_, l)| *l) || !samples.iter().any(|(_, l)| !*l) {
            return Err(PhishGuardError::Training(
                "both classes must be present".into(),
            ));
        }
        let mut model = Self {
            format_version: NGRAM_FORMAT_VERSION,
            n: params.n,
            buckets: params.buckets,
            weights: vec![0.0; params.buckets],
            bias: 0.0,
        };
        model.validate()?;

        let encoded: Vec<(Vec<(usize, f64)>, f64)> = samples
            .iter()
            .map(|(u, l)| (model.encode(u), if *l { 1.0 } else { 0.0 }))
            .collect();
        let n = encoded.len() as f64;
        for _ in 0..params.epochs {
            let mut grad = vec![0.0; model.buckets];
            let mut grad_b = 0.0;
            for (x, y) in &encoded {
                let err = sigmoid(model.logit(x)) - y;
                for (i, v) in x {
                    grad[*i] += err * v;
                }
                grad_b += err;
            }
            for (w, g) in model.weights.iter_mut().zip(&grad) {
                *w -= params.learning_rate * g / n;
            }
            model.bias -= params.learning_rate * grad_b / n;
        }
        Ok(model)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| PhishGuardError::ModelArtifact(format!("{}: {e}", path.display())))?;
        let model: CharNgramModel = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| PhishGuardError::ModelArtifact(format!("{}: {e}", path.display())))?;
        model.validate()?;
        Ok(model)
    }
}

impl SequenceModel for CharNgramModel {
    fn name(&self) -> &str {
        "char-ngram"
    }

    fn score(&self, url: &str) -> f64 {
        sigmoid(self.logit(&self.encode(url)))
    }
}
