//! Group fairness metrics for binary classifiers
//!
//! Builds [`FairnessObject`]s comparing one or more classifiers across the
//! subgroups of a protected attribute, relative to a privileged subgroup:
//! - Per-subgroup rates from confusion matrices (TPR, PPV, STP, ...)
//! - Parity loss: summed absolute deviation from the privileged subgroup
//! - Fairness check table of signed deviations for five core metrics
//! - Merging with fairness objects from earlier runs without recomputation
//!
//! # Example
//! ```
//! use kolosal_fairness::fairness::{
//!     FairnessConfig, FairnessEvaluator, ModelEvaluation, ProtectedInput,
//! };
//! use ndarray::Array1;
//!
//! let model = ModelEvaluation::new(
//!     "logreg",
//!     Array1::from(vec![1.0, 0.0, 1.0, 0.0]),
//!     Array1::from(vec![0.6, 0.4, 0.7, 0.3]),
//! );
//! let protected =
//!     ProtectedInput::categorical(["male", "male", "female", "female"], ["female", "male"]);
//!
//! let evaluator = FairnessEvaluator::new(FairnessConfig::quiet());
//! let fobject = evaluator.evaluate(&[model], protected, "male", &[]).unwrap();
//! assert!(!fobject.missing_values());
//! ```

mod advisory;
mod attribute;
mod bundle;
mod check;
mod config;
mod confusion;
mod evaluation;
mod merge;
mod metrics;
mod validation;

pub use advisory::{Advisor, Advisory, Severity};
pub use attribute::{AttributeValue, ProtectedAttribute, ProtectedInput};
pub use bundle::{CheckStatus, FairnessObject, MetricCheck, ModelCheckSummary, ParityLossRow};
pub use check::{build_fairness_check, metric_description, FairnessCheckRow, CHECK_METRICS};
pub use config::{Cutoff, FairnessConfig, DEFAULT_CUTOFF, DEFAULT_EPSILON};
pub use confusion::{group_confusion_matrices, ConfusionMatrix};
pub use evaluation::{EvaluationSource, ModelEvaluation};
pub use merge::{merge, ModelResult};
pub use metrics::{LevelMetrics, Metric, ParityLoss, RateMetrics, N_METRICS};
pub use validation::{
    resolve_cutoff, resolve_labels, validate_compatible, validate_epsilon, validate_evaluation,
    validate_ground_truth, validate_privileged,
};

use crate::error::{FairnessError, Result};
use rayon::prelude::*;

/// Main fairness evaluator
pub struct FairnessEvaluator {
    config: FairnessConfig,
}

impl FairnessEvaluator {
    pub fn new(config: FairnessConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FairnessConfig {
        &self.config
    }

    /// Evaluate new models and merge them with prior fairness objects.
    ///
    /// # Arguments
    /// * `evaluations` - New models; at least one is required
    /// * `protected` - Protected attribute, parallel to the observations
    /// * `privileged` - Level treated as the fairness baseline
    /// * `priors` - Earlier fairness objects to merge in, possibly empty
    pub fn evaluate<S: EvaluationSource>(
        &self,
        evaluations: &[S],
        protected: ProtectedInput,
        privileged: impl Into<AttributeValue>,
        priors: &[FairnessObject],
    ) -> Result<FairnessObject> {
        self.evaluate_with_advisories(evaluations, protected, privileged, priors)
            .map(|(fobject, _)| fobject)
    }

    /// Like [`FairnessEvaluator::evaluate`], also returning the advisories
    /// emitted along the way (none unless `verbose` is set).
    pub fn evaluate_with_advisories<S: EvaluationSource>(
        &self,
        evaluations: &[S],
        protected: ProtectedInput,
        privileged: impl Into<AttributeValue>,
        priors: &[FairnessObject],
    ) -> Result<(FairnessObject, Vec<Advisory>)> {
        let advisor = Advisor::new(self.config.verbose, self.config.colorize);
        advisor.step("Creating fairness object");

        let epsilon = validate_epsilon(self.config.epsilon)?;
        if evaluations.is_empty() {
            return Err(FairnessError::ConfigError(
                "at least one model evaluation is required".to_string(),
            ));
        }

        let (protected, coerced) = protected.resolve()?;
        if coerced {
            if self.config.cutoff.is_multi_valued() {
                advisor.warn(
                    "protected attribute was converted to categorical; check that the cutoff \
                     values follow its level order",
                );
            } else {
                advisor.step("protected attribute converted to categorical");
            }
        }

        let privileged: AttributeValue = privileged.into();
        if !privileged.is_text() {
            advisor.step("privileged value converted to text");
        }
        let privileged = privileged.to_level();
        let privileged_idx = validate_privileged(&protected, &privileged)?;

        validate_compatible(&protected, &privileged, priors)?;

        let snapshots: Vec<ModelEvaluation> =
            evaluations.iter().map(ModelEvaluation::from_source).collect();
        for evaluation in &snapshots {
            validate_evaluation(evaluation, protected.len())?;
        }
        let inherited = priors.iter().flat_map(|p| p.evaluations().iter());
        validate_ground_truth(snapshots.iter().chain(inherited).map(|e| &e.y))?;

        let labels = resolve_labels(self.config.labels.as_deref(), &snapshots, priors)?;
        let cutoff = resolve_cutoff(&self.config.cutoff, protected.levels())?;
        advisor.step(&format!(
            "{} new model(s), {} inherited, {} levels, privileged '{}'",
            snapshots.len(),
            priors.iter().map(FairnessObject::n_models).sum::<usize>(),
            protected.n_levels(),
            privileged
        ));

        let jobs: Vec<ModelEvaluation> = snapshots
            .into_iter()
            .zip(labels)
            .map(|(evaluation, label)| evaluation.with_label(label))
            .collect();

        let compute = |evaluation: ModelEvaluation| {
            compute_model(evaluation, &protected, &cutoff, privileged_idx)
        };
        let results: Vec<ModelResult> = if self.config.parallel {
            jobs.into_par_iter().map(compute).collect::<Result<_>>()?
        } else {
            jobs.into_iter().map(compute).collect::<Result<_>>()?
        };

        if results.iter().any(ModelResult::has_missing) {
            advisor.warn("some metrics produced missing values");
        }

        let fobject = merge(results, priors, protected, privileged, epsilon);
        advisor.step("Fairness object created");
        Ok((fobject, advisor.into_advisories()))
    }
}

/// Confusion matrices, rates, parity loss and fairness check rows of one model
fn compute_model(
    evaluation: ModelEvaluation,
    protected: &ProtectedAttribute,
    cutoff: &[f64],
    privileged: usize,
) -> Result<ModelResult> {
    let matrices = group_confusion_matrices(protected, &evaluation.y_hat, &evaluation.y, cutoff)?;

    let groups: Vec<LevelMetrics> = protected
        .levels()
        .iter()
        .zip(matrices.iter())
        .map(|(level, cm)| LevelMetrics {
            level: level.clone(),
            metrics: RateMetrics::from_confusion(cm),
        })
        .collect();

    let parity_loss = ParityLoss::compute(&groups, privileged);
    let fairness_check = build_fairness_check(&evaluation.label, &groups, privileged);

    Ok(ModelResult {
        evaluation,
        groups,
        parity_loss,
        fairness_check,
        cutoff: cutoff.to_vec(),
    })
}
