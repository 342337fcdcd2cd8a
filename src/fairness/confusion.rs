//! Per-subgroup confusion matrices

use super::attribute::ProtectedAttribute;
use crate::error::{FairnessError, Result};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Confusion matrix counts for one subgroup at one cutoff
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfusionMatrix {
    pub tp: usize,
    pub tn: usize,
    pub fp: usize,
    pub fn_: usize,
}

impl ConfusionMatrix {
    pub fn new(tp: usize, tn: usize, fp: usize, fn_: usize) -> Self {
        Self { tp, tn, fp, fn_ }
    }

    /// Total number of observations counted
    pub fn total(&self) -> usize {
        self.tp + self.tn + self.fp + self.fn_
    }

    /// Actual positives (TP + FN)
    pub fn positives(&self) -> usize {
        self.tp + self.fn_
    }

    /// Actual negatives (TN + FP)
    pub fn negatives(&self) -> usize {
        self.tn + self.fp
    }

    fn record(&mut self, predicted_positive: bool, actual_positive: bool) {
        match (predicted_positive, actual_positive) {
            (true, true) => self.tp += 1,
            (true, false) => self.fp += 1,
            (false, false) => self.tn += 1,
            (false, true) => self.fn_ += 1,
        }
    }
}

/// Build one confusion matrix per level of `protected`, in level order.
///
/// An observation is predicted positive when its probability is at least
/// the cutoff of its level. Levels without observations get zero counts.
/// `cutoffs` must hold one threshold per level.
pub fn group_confusion_matrices(
    protected: &ProtectedAttribute,
    probabilities: &Array1<f64>,
    ground_truth: &Array1<f64>,
    cutoffs: &[f64],
) -> Result<Vec<ConfusionMatrix>> {
    if cutoffs.len() != protected.n_levels() {
        return Err(FairnessError::ConfigError(format!(
            "expected {} cutoffs, one per level, got {}",
            protected.n_levels(),
            cutoffs.len()
        )));
    }
    if probabilities.len() != protected.len() || ground_truth.len() != protected.len() {
        return Err(FairnessError::IncompatibilityError(format!(
            "protected attribute has {} observations, predictions {} and targets {}",
            protected.len(),
            probabilities.len(),
            ground_truth.len()
        )));
    }

    let mut matrices = vec![ConfusionMatrix::default(); protected.n_levels()];
    let codes = protected.codes();

    for ((&code, &p), &y) in codes.iter().zip(probabilities.iter()).zip(ground_truth.iter()) {
        let predicted_positive = p >= cutoffs[code];
        let actual_positive = (y - 1.0).abs() < 1e-10;
        matrices[code].record(predicted_positive, actual_positive);
    }

    Ok(matrices)
}
