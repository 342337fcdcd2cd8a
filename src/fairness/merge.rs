//! Merging freshly computed models with prior fairness objects
//!
//! Merging is order-preserving concatenation keyed by unique labels: new
//! models come first, then each prior object's models in the order the
//! priors were supplied. Prior results are copied, never recomputed.

use super::attribute::ProtectedAttribute;
use super::bundle::{FairnessObject, ParityLossRow};
use super::check::FairnessCheckRow;
use super::evaluation::ModelEvaluation;
use super::metrics::{LevelMetrics, ParityLoss};
use std::collections::HashMap;

/// Everything computed for one new model
#[derive(Debug, Clone, PartialEq)]
pub struct ModelResult {
    /// Evaluation carrying its resolved label
    pub evaluation: ModelEvaluation,
    pub groups: Vec<LevelMetrics>,
    pub parity_loss: ParityLoss,
    pub fairness_check: Vec<FairnessCheckRow>,
    pub cutoff: Vec<f64>,
}

impl ModelResult {
    pub fn label(&self) -> &str {
        &self.evaluation.label
    }

    /// Whether any rate or parity loss of this model is missing
    pub fn has_missing(&self) -> bool {
        self.parity_loss.has_missing() || self.groups.iter().any(|g| g.metrics.has_missing())
    }
}

/// Combine new model results with already validated prior objects
pub fn merge(
    results: Vec<ModelResult>,
    priors: &[FairnessObject],
    protected: ProtectedAttribute,
    privileged: String,
    epsilon: f64,
) -> FairnessObject {
    let mut parity_loss = Vec::new();
    let mut groups_data = HashMap::new();
    let mut fairness_check_data = Vec::new();
    let mut evaluations = Vec::new();
    let mut labels = Vec::new();
    let mut cutoffs = HashMap::new();
    let mut missing_values = false;

    for result in results {
        missing_values |= result.has_missing();
        let label = result.label().to_string();

        parity_loss.push(ParityLossRow {
            label: label.clone(),
            parity_loss: result.parity_loss,
        });
        groups_data.insert(label.clone(), result.groups);
        fairness_check_data.extend(result.fairness_check);
        cutoffs.insert(label.clone(), result.cutoff);
        evaluations.push(result.evaluation);
        labels.push(label);
    }

    for prior in priors {
        missing_values |= prior.missing_values;
        parity_loss.extend(prior.parity_loss.iter().cloned());
        groups_data.extend(prior.groups_data.iter().map(|(k, v)| (k.clone(), v.clone())));
        fairness_check_data.extend(prior.fairness_check_data.iter().cloned());
        cutoffs.extend(prior.cutoffs.iter().map(|(k, v)| (k.clone(), v.clone())));
        evaluations.extend(prior.evaluations.iter().cloned());
        labels.extend(prior.labels.iter().cloned());
    }

    FairnessObject {
        parity_loss,
        groups_data,
        fairness_check_data,
        evaluations,
        privileged,
        protected,
        labels,
        cutoffs,
        epsilon,
        missing_values,
    }
}
