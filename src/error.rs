//! Error types for the Kolosal fairness engine

use thiserror::Error;

/// Result type alias for fairness operations
pub type Result<T> = std::result::Result<T, FairnessError>;

/// Main error type for fairness computation and merging.
///
/// Every variant is fatal to the current invocation: the engine either
/// returns a complete bundle or one of these.
#[derive(Error, Debug)]
pub enum FairnessError {
    /// Malformed call-site arguments (epsilon, cutoff, labels, inputs)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Privileged value or protected values outside the attribute's domain
    #[error("Domain error: {0}")]
    DomainError(String),

    /// Bundles or evaluations that cannot be compared with each other
    #[error("Incompatibility error: {0}")]
    IncompatibilityError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serde_json::Error> for FairnessError {
    fn from(err: serde_json::Error) -> Self {
        FairnessError::SerializationError(err.to_string())
    }
}
