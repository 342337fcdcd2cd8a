//! Model evaluation inputs
//!
//! An evaluation pairs ground-truth labels with predicted probabilities for
//! one classifier. Anything implementing [`EvaluationSource`] can be fed to
//! the evaluator; it is snapshotted into a [`ModelEvaluation`] that the
//! resulting bundle owns.

use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Provider of per-observation labels and probabilities for one model
pub trait EvaluationSource {
    /// Display label of the model
    fn label(&self) -> &str;

    /// Ground truth, one 0/1 label per observation
    fn ground_truth(&self) -> &Array1<f64>;

    /// Predicted probability of the positive class per observation
    fn probabilities(&self) -> &Array1<f64>;
}

/// Owned evaluation input for a single model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelEvaluation {
    /// Display label, unique within a bundle
    pub label: String,
    /// Ground truth labels (0.0 / 1.0)
    pub y: Array1<f64>,
    /// Predicted probabilities in [0, 1]
    pub y_hat: Array1<f64>,
}

impl ModelEvaluation {
    pub fn new(label: impl Into<String>, y: Array1<f64>, y_hat: Array1<f64>) -> Self {
        Self {
            label: label.into(),
            y,
            y_hat,
        }
    }

    /// Snapshot any evaluation source
    pub fn from_source<S: EvaluationSource + ?Sized>(source: &S) -> Self {
        Self::new(
            source.label(),
            source.ground_truth().clone(),
            source.probabilities().clone(),
        )
    }

    /// Replace the display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Number of observations
    pub fn len(&self) -> usize {
        self.y.len()
    }

    pub fn is_empty(&self) -> bool {
        self.y.is_empty()
    }
}

impl EvaluationSource for ModelEvaluation {
    fn label(&self) -> &str {
        &self.label
    }

    fn ground_truth(&self) -> &Array1<f64> {
        &self.y
    }

    fn probabilities(&self) -> &Array1<f64> {
        &self.y_hat
    }
}
