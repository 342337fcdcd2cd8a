//! Kolosal Fairness - Group fairness metrics for binary classifiers
//!
//! This crate compares one or more binary classifiers across the subgroups
//! of a protected attribute (sex, race, ...) relative to a privileged
//! subgroup, and merges results from several evaluation runs into one
//! comparable fairness object.
//!
//! # Modules
//!
//! - [`fairness`] - Validation, subgroup rates, parity loss, fairness check
//!   table and merging of fairness objects
//! - [`cli`] - Command-line interface
//!
//! Errors are reported through [`FairnessError`]; advisories go through
//! `tracing` and can be switched off per call via [`fairness::FairnessConfig`].

// Core error handling
pub mod error;

// Fairness engine
pub mod fairness;

// Services
pub mod cli;

pub use error::{FairnessError, Result};

/// Re-export commonly used types
pub mod prelude {
    // Error handling
    pub use crate::error::{FairnessError, Result};

    // Inputs and configuration
    pub use crate::fairness::{
        AttributeValue, Cutoff, EvaluationSource, FairnessConfig, ModelEvaluation, ProtectedInput,
    };

    // Evaluation and results
    pub use crate::fairness::{
        CheckStatus, FairnessCheckRow, FairnessEvaluator, FairnessObject, Metric, ParityLoss,
        RateMetrics,
    };
}
