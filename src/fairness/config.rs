//! Fairness evaluation configuration

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default fairness boundary
pub const DEFAULT_EPSILON: f64 = 0.1;

/// Default probability threshold
pub const DEFAULT_CUTOFF: f64 = 0.5;

/// Probability threshold(s) turning scores into decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cutoff {
    /// Same threshold for every level
    Scalar(f64),
    /// One threshold per level, in level order (length 1 is broadcast)
    PerLevel(Vec<f64>),
    /// Thresholds by level name; unnamed levels use the default cutoff
    Named(BTreeMap<String, f64>),
}

impl Cutoff {
    /// Whether the cutoff already distinguishes between levels
    pub fn is_multi_valued(&self) -> bool {
        match self {
            Cutoff::Scalar(_) => false,
            Cutoff::PerLevel(values) => values.len() > 1,
            Cutoff::Named(map) => !map.is_empty(),
        }
    }
}

impl Default for Cutoff {
    fn default() -> Self {
        Cutoff::Scalar(DEFAULT_CUTOFF)
    }
}

impl From<f64> for Cutoff {
    fn from(value: f64) -> Self {
        Cutoff::Scalar(value)
    }
}

impl From<Vec<f64>> for Cutoff {
    fn from(values: Vec<f64>) -> Self {
        Cutoff::PerLevel(values)
    }
}

/// Configuration for building a fairness object
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FairnessConfig {
    /// Fairness boundary; `None` means [`DEFAULT_EPSILON`]
    pub epsilon: Option<f64>,

    /// Per-level probability thresholds
    pub cutoff: Cutoff,

    /// Explicit labels for the new evaluations, overriding their own
    pub labels: Option<Vec<String>>,

    /// Emit advisory messages
    pub verbose: bool,

    /// Colour advisory messages
    pub colorize: bool,

    /// Compute models in parallel
    pub parallel: bool,
}

impl Default for FairnessConfig {
    fn default() -> Self {
        Self {
            epsilon: None,
            cutoff: Cutoff::default(),
            labels: None,
            verbose: true,
            colorize: true,
            parallel: true,
        }
    }
}

impl FairnessConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    pub fn with_cutoff(mut self, cutoff: impl Into<Cutoff>) -> Self {
        self.cutoff = cutoff.into();
        self
    }

    pub fn with_labels<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.labels = Some(labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_colorize(mut self, colorize: bool) -> Self {
        self.colorize = colorize;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Configuration without advisory output
    pub fn quiet() -> Self {
        Self::default().with_verbose(false).with_colorize(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FairnessConfig::default();
        assert_eq!(config.epsilon, None);
        assert_eq!(config.cutoff, Cutoff::Scalar(0.5));
        assert!(config.verbose);
        assert!(config.parallel);
    }

    #[test]
    fn test_builder() {
        let config = FairnessConfig::quiet()
            .with_epsilon(0.05)
            .with_cutoff(vec![0.4, 0.6])
            .with_labels(["a", "b"]);
        assert_eq!(config.epsilon, Some(0.05));
        assert!(config.cutoff.is_multi_valued());
        assert_eq!(config.labels.as_deref(), Some(&["a".to_string(), "b".to_string()][..]));
        assert!(!config.verbose);
    }

    #[test]
    fn test_multi_valued() {
        assert!(!Cutoff::Scalar(0.3).is_multi_valued());
        assert!(!Cutoff::PerLevel(vec![0.3]).is_multi_valued());
        assert!(Cutoff::Named(BTreeMap::from([("a".to_string(), 0.2)])).is_multi_valued());
    }
}
