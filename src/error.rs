//! Error types for the phishguard scoring engine.
//!
//! Scoring itself is total and never fails; these errors only surface at the
//! loading boundaries (classifier artifacts, configuration files, intel feeds).

use thiserror::Error;

/// Main error type for phishguard operations.
#[derive(Debug, Error)]
pub enum PhishGuardError {
    /// URL could not be interpreted at all
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Classifier artifact is missing, unreadable or malformed
    #[error("Model artifact error: {0}")]
    ModelArtifact(String),

    /// Artifact vectors disagree with the feature projection
    #[error("Model shape mismatch: expected {expected} features, found {found}")]
    ModelShape { expected: usize, found: usize },

    /// Labeled training data is unusable
    #[error("Training error: {0}")]
    Training(String),

    /// Threat-intel feed could not be fetched or parsed
    #[error("Feed error: {0}")]
    Feed(String),

    /// Invalid configuration values
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for PhishGuardError {
    fn from(err: serde_json::Error) -> Self {
        PhishGuardError::Serialization(err.to_string())
    }
}

/// Result type alias for phishguard operations
pub type Result<T> = std::result::Result<T, PhishGuardError>;
