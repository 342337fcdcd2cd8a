//! Fairness check table
//!
//! Long-form table of signed deviations from the privileged subgroup for
//! the five metrics used in fairness checks, one row per
//! (model, metric, non-privileged subgroup).

use super::metrics::{deviation, LevelMetrics, Metric};
use serde::{Deserialize, Serialize};

/// Metrics reported in the fairness check, in row order
pub const CHECK_METRICS: [Metric; 5] = [
    Metric::TPR,
    Metric::PPV,
    Metric::FPR,
    Metric::ACC,
    Metric::STP,
];

/// Human-readable description of a fairness check metric
pub fn metric_description(metric: Metric) -> &'static str {
    match metric {
        Metric::TPR => "Equal opportunity difference     TP/(TP + FN)",
        Metric::PPV => "Predictive parity difference     TP/(TP + FP)",
        Metric::FPR => "Predictive equality difference   FP/(FP + TN)",
        Metric::ACC => "Accuracy equality difference     (TP + TN)/(TP + FP + TN + FN)",
        Metric::STP => "Statistical parity difference    (TP + FP)/(TP + FP + TN + FN)",
        _ => "",
    }
}

/// One row of the fairness check table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FairnessCheckRow {
    /// rate(subgroup) - rate(privileged); missing if either rate is missing
    pub score: Option<f64>,
    pub subgroup: String,
    pub metric: Metric,
    pub description: String,
    pub model: String,
}

/// Rows for one model. `groups` are in level order and `privileged`
/// indexes into them; the privileged level is never emitted.
pub fn build_fairness_check(
    model: &str,
    groups: &[LevelMetrics],
    privileged: usize,
) -> Vec<FairnessCheckRow> {
    let base = &groups[privileged].metrics;
    let mut rows = Vec::with_capacity(CHECK_METRICS.len() * groups.len().saturating_sub(1));

    for metric in CHECK_METRICS {
        for (i, group) in groups.iter().enumerate() {
            if i == privileged {
                continue;
            }
            rows.push(FairnessCheckRow {
                score: deviation(group.metrics.get(metric), base.get(metric)),
                subgroup: group.level.clone(),
                metric,
                description: metric_description(metric).to_string(),
                model: model.to_string(),
            });
        }
    }

    rows
}
