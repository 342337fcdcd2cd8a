//! Rate metrics and parity loss
//!
//! Each subgroup's confusion matrix is turned into thirteen rates. A rate
//! whose denominator is zero is `None`; missing values propagate into the
//! parity loss instead of being replaced by a number.

use super::confusion::ConfusionMatrix;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of rate metrics per subgroup
pub const N_METRICS: usize = 13;

/// Rate metrics derived from a confusion matrix, in canonical order
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    /// True positive rate, TP/(TP + FN)
    TPR,
    /// True negative rate, TN/(TN + FP)
    TNR,
    /// Positive predictive value, TP/(TP + FP)
    PPV,
    /// Negative predictive value, TN/(TN + FN)
    NPV,
    /// False negative rate, FN/(TP + FN)
    FNR,
    /// False positive rate, FP/(TN + FP)
    FPR,
    /// False discovery rate, FP/(TP + FP)
    FDR,
    /// False omission rate, FN/(TN + FN)
    FOR,
    /// Threat score, TP/(TP + FP + FN)
    TS,
    /// Statistical parity, (TP + FP)/total
    STP,
    /// Accuracy, (TP + TN)/total
    ACC,
    /// F1 score
    F1,
    /// Matthews correlation coefficient, in [-1, 1]
    MCC,
}

impl Metric {
    pub const ALL: [Metric; N_METRICS] = [
        Metric::TPR,
        Metric::TNR,
        Metric::PPV,
        Metric::NPV,
        Metric::FNR,
        Metric::FPR,
        Metric::FDR,
        Metric::FOR,
        Metric::TS,
        Metric::STP,
        Metric::ACC,
        Metric::F1,
        Metric::MCC,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Metric::TPR => "TPR",
            Metric::TNR => "TNR",
            Metric::PPV => "PPV",
            Metric::NPV => "NPV",
            Metric::FNR => "FNR",
            Metric::FPR => "FPR",
            Metric::FDR => "FDR",
            Metric::FOR => "FOR",
            Metric::TS => "TS",
            Metric::STP => "STP",
            Metric::ACC => "ACC",
            Metric::F1 => "F1",
            Metric::MCC => "MCC",
        }
    }

    /// Column name of this metric in the parity loss table
    pub fn parity_loss_name(self) -> String {
        format!("{}_parity_loss", self.name())
    }

    /// Position in [`Metric::ALL`]
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// Signed difference `a - b`, missing if either side is missing
pub fn deviation(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    Some(a? - b?)
}

/// The thirteen rates of one subgroup
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RateMetrics {
    values: [Option<f64>; N_METRICS],
}

impl RateMetrics {
    pub fn from_confusion(cm: &ConfusionMatrix) -> Self {
        let tp = cm.tp as f64;
        let tn = cm.tn as f64;
        let fp = cm.fp as f64;
        let fn_ = cm.fn_ as f64;
        let positives = cm.positives() as f64;
        let negatives = cm.negatives() as f64;
        let total = cm.total() as f64;

        let tpr = ratio(tp, positives);
        let ppv = ratio(tp, tp + fp);
        let f1 = match (ppv, tpr) {
            (Some(p), Some(r)) => ratio(2.0 * p * r, p + r),
            _ => None,
        };
        let mcc = ratio(
            tp * tn - fp * fn_,
            ((tp + fp) * positives * negatives * (tn + fn_)).sqrt(),
        );

        let mut values = [None; N_METRICS];
        values[Metric::TPR.index()] = tpr;
        values[Metric::TNR.index()] = ratio(tn, negatives);
        values[Metric::PPV.index()] = ppv;
        values[Metric::NPV.index()] = ratio(tn, tn + fn_);
        values[Metric::FNR.index()] = ratio(fn_, positives);
        values[Metric::FPR.index()] = ratio(fp, negatives);
        values[Metric::FDR.index()] = ratio(fp, tp + fp);
        values[Metric::FOR.index()] = ratio(fn_, tn + fn_);
        values[Metric::TS.index()] = ratio(tp, tp + fp + fn_);
        values[Metric::STP.index()] = ratio(tp + fp, total);
        values[Metric::ACC.index()] = ratio(tp + tn, total);
        values[Metric::F1.index()] = f1;
        values[Metric::MCC.index()] = mcc;

        Self { values }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Option<f64>)> + '_ {
        Metric::ALL.iter().map(move |&m| (m, self.get(m)))
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }
}

/// Rates of one subgroup, tagged with its level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelMetrics {
    pub level: String,
    pub metrics: RateMetrics,
}

/// Parity loss of one model: per metric, the summed absolute deviation of
/// every level's rate from the privileged level's rate
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParityLoss {
    values: [Option<f64>; N_METRICS],
}

impl ParityLoss {
    /// Compute from per-level rates; `privileged` indexes into `groups`
    pub fn compute(groups: &[LevelMetrics], privileged: usize) -> Self {
        let base = groups[privileged].metrics;
        let mut values = [None; N_METRICS];

        for metric in Metric::ALL {
            values[metric.index()] = groups
                .iter()
                .map(|g| deviation(g.metrics.get(metric), base.get(metric)).map(f64::abs))
                .sum::<Option<f64>>();
        }

        Self { values }
    }

    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values[metric.index()]
    }

    /// `(<METRIC>_parity_loss, value)` pairs in canonical order
    pub fn entries(&self) -> Vec<(String, Option<f64>)> {
        Metric::ALL
            .iter()
            .map(|&m| (m.parity_loss_name(), self.get(m)))
            .collect()
    }

    pub fn has_missing(&self) -> bool {
        self.values.iter().any(Option::is_none)
    }
}
