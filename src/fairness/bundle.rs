//! Fairness object: the mergeable result bundle
//!
//! A `FairnessObject` holds everything needed to compare its models and to
//! merge it into a later evaluation without recomputing anything. It is
//! immutable once built; merging always produces a new object.

use super::attribute::ProtectedAttribute;
use super::check::{metric_description, FairnessCheckRow, CHECK_METRICS};
use super::evaluation::ModelEvaluation;
use super::metrics::{LevelMetrics, Metric, ParityLoss};
use crate::error::{FairnessError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

/// Parity loss of one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParityLossRow {
    pub label: String,
    pub parity_loss: ParityLoss,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessObject {
    pub(crate) parity_loss: Vec<ParityLossRow>,
    pub(crate) groups_data: HashMap<String, Vec<LevelMetrics>>,
    pub(crate) fairness_check_data: Vec<FairnessCheckRow>,
    pub(crate) evaluations: Vec<ModelEvaluation>,
    pub(crate) privileged: String,
    pub(crate) protected: ProtectedAttribute,
    pub(crate) labels: Vec<String>,
    pub(crate) cutoffs: HashMap<String, Vec<f64>>,
    pub(crate) epsilon: f64,
    pub(crate) missing_values: bool,
}

/// Outcome of the epsilon check for one metric of one model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    /// Every subgroup deviation lies strictly inside (-epsilon, epsilon)
    Passed,
    /// At least one subgroup deviation lies outside the boundary
    Failed,
    /// No deviation is out of bounds but some could not be computed
    NotEvaluable,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricCheck {
    pub metric: Metric,
    pub description: String,
    pub status: CheckStatus,
    pub failing_subgroups: Vec<String>,
    pub missing_subgroups: Vec<String>,
}

/// Epsilon summary for one model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelCheckSummary {
    pub label: String,
    pub metrics: Vec<MetricCheck>,
    /// Number of metrics with [`CheckStatus::Passed`]
    pub passed: usize,
}

impl FairnessObject {
    /// Parity loss table, one row per model
    pub fn parity_loss(&self) -> &[ParityLossRow] {
        &self.parity_loss
    }

    pub fn parity_loss_of(&self, label: &str) -> Option<&ParityLoss> {
        self.parity_loss
            .iter()
            .find(|row| row.label == label)
            .map(|row| &row.parity_loss)
    }

    /// Rates per level, keyed by model label
    pub fn groups_data(&self) -> &HashMap<String, Vec<LevelMetrics>> {
        &self.groups_data
    }

    pub fn group_metrics_of(&self, label: &str) -> Option<&[LevelMetrics]> {
        self.groups_data.get(label).map(Vec::as_slice)
    }

    pub fn fairness_check_data(&self) -> &[FairnessCheckRow] {
        &self.fairness_check_data
    }

    pub fn evaluations(&self) -> &[ModelEvaluation] {
        &self.evaluations
    }

    pub fn privileged(&self) -> &str {
        &self.privileged
    }

    pub fn protected(&self) -> &ProtectedAttribute {
        &self.protected
    }

    /// Model labels, newest evaluations first
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn cutoffs(&self) -> &HashMap<String, Vec<f64>> {
        &self.cutoffs
    }

    pub fn cutoff_of(&self, label: &str) -> Option<&[f64]> {
        self.cutoffs.get(label).map(Vec::as_slice)
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Whether any rate or parity loss came out missing
    pub fn missing_values(&self) -> bool {
        self.missing_values
    }

    pub fn n_models(&self) -> usize {
        self.labels.len()
    }

    /// Per model, which fairness check metrics stay within epsilon
    pub fn check_summary(&self) -> Vec<ModelCheckSummary> {
        self.labels
            .iter()
            .map(|label| {
                let metrics: Vec<MetricCheck> = CHECK_METRICS
                    .iter()
                    .map(|&metric| self.metric_check(label, metric))
                    .collect();
                let passed = metrics
                    .iter()
                    .filter(|m| m.status == CheckStatus::Passed)
                    .count();
                ModelCheckSummary {
                    label: label.clone(),
                    metrics,
                    passed,
                }
            })
            .collect()
    }

    fn metric_check(&self, label: &str, metric: Metric) -> MetricCheck {
        let mut failing_subgroups = Vec::new();
        let mut missing_subgroups = Vec::new();

        for row in self
            .fairness_check_data
            .iter()
            .filter(|r| r.model == label && r.metric == metric)
        {
            match row.score {
                Some(score) if score.abs() >= self.epsilon => {
                    failing_subgroups.push(row.subgroup.clone())
                }
                Some(_) => {}
                None => missing_subgroups.push(row.subgroup.clone()),
            }
        }

        let status = if !failing_subgroups.is_empty() {
            CheckStatus::Failed
        } else if !missing_subgroups.is_empty() {
            CheckStatus::NotEvaluable
        } else {
            CheckStatus::Passed
        };

        MetricCheck {
            metric,
            description: metric_description(metric).to_string(),
            status,
            failing_subgroups,
            missing_subgroups,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let fobject: Self = serde_json::from_str(json)?;
        fobject.check_privileged()
    }

    /// Write the object as JSON so it can be merged in a later run
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(BufWriter::new(file), self)?;
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        let fobject: Self = serde_json::from_reader(BufReader::new(file))?;
        fobject.check_privileged()
    }

    fn check_privileged(self) -> Result<Self> {
        if self.protected.level_index(&self.privileged).is_none() {
            return Err(FairnessError::DomainError(format!(
                "stored privileged value '{}' is not a protected level",
                self.privileged
            )));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::{FairnessConfig, FairnessEvaluator, ModelEvaluation, ProtectedInput};
    use ndarray::Array1;

    fn build(y_hat: Vec<f64>, epsilon: f64) -> FairnessObject {
        let model = ModelEvaluation::new(
            "lr",
            Array1::from(vec![1.0, 0.0, 1.0, 0.0, 1.0, 1.0]),
            Array1::from(y_hat),
        );
        let protected =
            ProtectedInput::categorical(["a", "a", "b", "b", "c", "c"], ["a", "b", "c"]);
        FairnessEvaluator::new(FairnessConfig::quiet().with_epsilon(epsilon))
            .evaluate(&[model], protected, "a", &[])
            .unwrap()
    }

    #[test]
    fn test_summary_statuses() {
        // b misses its positive; c has no negatives, so FPR is undefined there
        let fobject = build(vec![0.9, 0.1, 0.2, 0.1, 0.8, 0.7], 0.1);
        let summary = &fobject.check_summary()[0];

        let status = |metric: Metric| {
            summary.metrics.iter().find(|m| m.metric == metric).unwrap().clone()
        };
        let tpr = status(Metric::TPR);
        assert_eq!(tpr.status, CheckStatus::Failed);
        assert_eq!(tpr.failing_subgroups, vec!["b".to_string()]);

        let fpr = status(Metric::FPR);
        assert_eq!(fpr.status, CheckStatus::NotEvaluable);
        assert_eq!(fpr.missing_subgroups, vec!["c".to_string()]);

        assert!(summary.passed < 5);
        assert!(fobject.missing_values());
    }

    #[test]
    fn test_large_epsilon_passes_everything_defined() {
        let fobject = build(vec![0.9, 0.1, 0.9, 0.1, 0.8, 0.7], 0.6);
        let summary = &fobject.check_summary()[0];
        assert!(summary
            .metrics
            .iter()
            .all(|m| m.status != CheckStatus::Failed));
    }

    #[test]
    fn test_json_roundtrip() {
        let fobject = build(vec![0.9, 0.1, 0.2, 0.1, 0.8, 0.7], 0.1);
        let json = fobject.to_json().unwrap();
        let restored = FairnessObject::from_json(&json).unwrap();
        assert_eq!(restored, fobject);
        assert!(FairnessObject::from_json("{}").is_err());
    }

    #[test]
    fn test_corrupted_protected_is_rejected() {
        let fobject = build(vec![0.9, 0.1, 0.2, 0.1, 0.8, 0.7], 0.1);
        let json = fobject.to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["protected"]["values"][0] = serde_json::Value::from("zz");

        let result = FairnessObject::from_json(&value.to_string());
        assert!(matches!(result, Err(FairnessError::SerializationError(_))));
    }

    #[test]
    fn test_unknown_privileged_is_rejected() {
        let fobject = build(vec![0.9, 0.1, 0.2, 0.1, 0.8, 0.7], 0.1);
        let json = fobject.to_json().unwrap();
        let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
        value["privileged"] = serde_json::Value::from("zz");

        let result = FairnessObject::from_json(&value.to_string());
        assert!(matches!(result, Err(FairnessError::DomainError(_))));
    }

    #[test]
    fn test_accessors() {
        let fobject = build(vec![0.9, 0.1, 0.9, 0.1, 0.8, 0.7], 0.1);
        assert_eq!(fobject.n_models(), 1);
        assert_eq!(fobject.privileged(), "a");
        assert_eq!(fobject.group_metrics_of("lr").unwrap().len(), 3);
        assert!(fobject.parity_loss_of("missing").is_none());
        assert_eq!(fobject.protected().len(), 6);
    }
}
