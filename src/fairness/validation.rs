//! Input validation
//!
//! Every check here runs before any per-model computation. A failure aborts
//! the whole invocation.

use super::attribute::ProtectedAttribute;
use super::bundle::FairnessObject;
use super::config::{Cutoff, DEFAULT_CUTOFF, DEFAULT_EPSILON};
use super::evaluation::ModelEvaluation;
use crate::error::{FairnessError, Result};
use ndarray::Array1;
use std::collections::HashSet;

/// Resolve epsilon, defaulting to 0.1
pub fn validate_epsilon(epsilon: Option<f64>) -> Result<f64> {
    let epsilon = epsilon.unwrap_or(DEFAULT_EPSILON);
    if !epsilon.is_finite() {
        return Err(FairnessError::ConfigError(format!(
            "epsilon must be a single finite number, got {}",
            epsilon
        )));
    }
    Ok(epsilon)
}

/// Position of the privileged level within the attribute's levels
pub fn validate_privileged(protected: &ProtectedAttribute, privileged: &str) -> Result<usize> {
    protected.level_index(privileged).ok_or_else(|| {
        FairnessError::DomainError(format!(
            "privileged not in protected: '{}' is not one of [{}]",
            privileged,
            protected.levels().join(", ")
        ))
    })
}

/// Expand a cutoff into one threshold per level
pub fn resolve_cutoff(cutoff: &Cutoff, levels: &[String]) -> Result<Vec<f64>> {
    let values = match cutoff {
        Cutoff::Scalar(value) => vec![*value; levels.len()],
        Cutoff::PerLevel(values) => match values.len() {
            0 => {
                return Err(FairnessError::ConfigError(
                    "cutoff must contain at least one value".to_string(),
                ))
            }
            1 => vec![values[0]; levels.len()],
            n if n == levels.len() => values.clone(),
            n => {
                return Err(FairnessError::ConfigError(format!(
                    "cutoff has {} values but the protected attribute has {} levels",
                    n,
                    levels.len()
                )))
            }
        },
        Cutoff::Named(map) => {
            if let Some(unknown) = map.keys().find(|k| !levels.contains(k)) {
                return Err(FairnessError::ConfigError(format!(
                    "cutoff given for '{}', which is not a protected level",
                    unknown
                )));
            }
            levels
                .iter()
                .map(|l| map.get(l).copied().unwrap_or(DEFAULT_CUTOFF))
                .collect()
        }
    };

    if let Some(bad) = values.iter().find(|v| !(0.0..=1.0).contains(*v)) {
        return Err(FairnessError::ConfigError(format!(
            "cutoff values must lie in [0, 1], got {}",
            bad
        )));
    }

    Ok(values)
}

/// Structural checks of one evaluation against the number of observations
pub fn validate_evaluation(evaluation: &ModelEvaluation, n_observations: usize) -> Result<()> {
    if evaluation.y.len() != evaluation.y_hat.len() {
        return Err(FairnessError::ConfigError(format!(
            "model '{}' has {} targets but {} predictions",
            evaluation.label,
            evaluation.y.len(),
            evaluation.y_hat.len()
        )));
    }
    if evaluation.y.len() != n_observations {
        return Err(FairnessError::IncompatibilityError(format!(
            "model '{}' has {} observations, protected attribute has {}",
            evaluation.label,
            evaluation.y.len(),
            n_observations
        )));
    }
    if evaluation.y.iter().any(|&y| y != 0.0 && y != 1.0) {
        return Err(FairnessError::ConfigError(format!(
            "model '{}' has targets other than 0 and 1",
            evaluation.label
        )));
    }
    if evaluation
        .y_hat
        .iter()
        .any(|p| !(0.0..=1.0).contains(p))
    {
        return Err(FairnessError::ConfigError(format!(
            "model '{}' has predicted probabilities outside [0, 1]",
            evaluation.label
        )));
    }
    Ok(())
}

/// Every ground truth vector must equal the first one element-wise
pub fn validate_ground_truth<'a, I>(targets: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Array1<f64>>,
{
    let mut targets = targets.into_iter();
    let Some(reference) = targets.next() else {
        return Ok(());
    };
    for target in targets {
        if target != reference {
            return Err(FairnessError::IncompatibilityError(
                "target variable mismatch: all models must be evaluated on the same observations"
                    .to_string(),
            ));
        }
    }
    Ok(())
}

/// Prior bundles must share the protected vector, its levels and the
/// privileged value
pub fn validate_compatible(
    protected: &ProtectedAttribute,
    privileged: &str,
    priors: &[FairnessObject],
) -> Result<()> {
    for prior in priors {
        if prior.protected().values() != protected.values() {
            return Err(FairnessError::IncompatibilityError(
                "fairness objects must share protected vector".to_string(),
            ));
        }
        if prior.protected().levels() != protected.levels() {
            return Err(FairnessError::IncompatibilityError(format!(
                "fairness objects must share protected levels ([{}] vs [{}])",
                prior.protected().levels().join(", "),
                protected.levels().join(", ")
            )));
        }
        if prior.privileged() != privileged {
            return Err(FairnessError::IncompatibilityError(format!(
                "fairness objects must share privileged value ('{}' vs '{}')",
                prior.privileged(),
                privileged
            )));
        }
    }
    Ok(())
}

/// Resolve labels of the new evaluations and check them for uniqueness
pub fn resolve_labels(
    explicit: Option<&[String]>,
    evaluations: &[ModelEvaluation],
    priors: &[FairnessObject],
) -> Result<Vec<String>> {
    let labels: Vec<String> = match explicit {
        Some(labels) if labels.len() != evaluations.len() => {
            return Err(FairnessError::ConfigError(format!(
                "{} labels given for {} models",
                labels.len(),
                evaluations.len()
            )))
        }
        Some(labels) => labels.to_vec(),
        None => evaluations.iter().map(|e| e.label.clone()).collect(),
    };

    let mut seen = HashSet::new();
    let inherited = priors.iter().flat_map(|p| p.labels().iter());
    for label in labels.iter().chain(inherited) {
        if !seen.insert(label.as_str()) {
            return Err(FairnessError::ConfigError(format!(
                "duplicate label '{}': model labels must be unique",
                label
            )));
        }
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fairness::attribute::ProtectedInput;
    use crate::fairness::{FairnessConfig, FairnessEvaluator};
    use std::collections::BTreeMap;

    fn levels() -> Vec<String> {
        vec!["female".to_string(), "male".to_string()]
    }

    fn eval(label: &str, y: Vec<f64>, y_hat: Vec<f64>) -> ModelEvaluation {
        ModelEvaluation::new(label, Array1::from(y), Array1::from(y_hat))
    }

    #[test]
    fn test_epsilon_default() {
        assert_eq!(validate_epsilon(None).unwrap(), 0.1);
        assert_eq!(validate_epsilon(Some(0.2)).unwrap(), 0.2);
        assert!(matches!(validate_epsilon(Some(f64::NAN)), Err(FairnessError::ConfigError(_))));
    }

    #[test]
    fn test_privileged_membership() {
        let (attr, _) = ProtectedInput::raw(["male", "female"]).resolve().unwrap();
        assert_eq!(validate_privileged(&attr, "male").unwrap(), 1);
        assert!(matches!(
            validate_privileged(&attr, "other"),
            Err(FairnessError::DomainError(_))
        ));
    }

    #[test]
    fn test_cutoff_broadcast() {
        assert_eq!(resolve_cutoff(&Cutoff::Scalar(0.3), &levels()).unwrap(), vec![0.3, 0.3]);
        assert_eq!(
            resolve_cutoff(&Cutoff::PerLevel(vec![0.4]), &levels()).unwrap(),
            vec![0.4, 0.4]
        );
        assert_eq!(
            resolve_cutoff(&Cutoff::PerLevel(vec![0.4, 0.6]), &levels()).unwrap(),
            vec![0.4, 0.6]
        );
    }

    #[test]
    fn test_cutoff_wrong_length() {
        let result = resolve_cutoff(&Cutoff::PerLevel(vec![0.4, 0.5, 0.6]), &levels());
        assert!(matches!(result, Err(FairnessError::ConfigError(_))));
        let result = resolve_cutoff(&Cutoff::PerLevel(vec![]), &levels());
        assert!(matches!(result, Err(FairnessError::ConfigError(_))));
    }

    #[test]
    fn test_cutoff_out_of_range() {
        assert!(resolve_cutoff(&Cutoff::Scalar(1.5), &levels()).is_err());
        assert!(resolve_cutoff(&Cutoff::Scalar(f64::NAN), &levels()).is_err());
    }

    #[test]
    fn test_named_cutoff() {
        let named = Cutoff::Named(BTreeMap::from([("male".to_string(), 0.7)]));
        assert_eq!(resolve_cutoff(&named, &levels()).unwrap(), vec![0.5, 0.7]);

        let unknown = Cutoff::Named(BTreeMap::from([("other".to_string(), 0.7)]));
        assert!(matches!(
            resolve_cutoff(&unknown, &levels()),
            Err(FairnessError::ConfigError(_))
        ));
    }

    #[test]
    fn test_evaluation_shape() {
        assert!(validate_evaluation(&eval("a", vec![1.0, 0.0], vec![0.2, 0.8]), 2).is_ok());
        assert!(matches!(
            validate_evaluation(&eval("a", vec![1.0, 0.0], vec![0.2]), 2),
            Err(FairnessError::ConfigError(_))
        ));
        assert!(matches!(
            validate_evaluation(&eval("a", vec![1.0], vec![0.2]), 2),
            Err(FairnessError::IncompatibilityError(_))
        ));
        assert!(validate_evaluation(&eval("a", vec![2.0, 0.0], vec![0.2, 0.8]), 2).is_err());
        assert!(validate_evaluation(&eval("a", vec![1.0, 0.0], vec![0.2, 1.8]), 2).is_err());
    }

    #[test]
    fn test_ground_truth_mismatch() {
        let a = Array1::from(vec![1.0, 0.0]);
        let b = Array1::from(vec![0.0, 1.0]);
        assert!(validate_ground_truth([&a, &a]).is_ok());
        assert!(matches!(
            validate_ground_truth([&a, &b]),
            Err(FairnessError::IncompatibilityError(_))
        ));
    }

    #[test]
    fn test_prior_with_other_levels_is_incompatible() {
        let evaluator = FairnessEvaluator::new(FairnessConfig::quiet());
        let model = eval("old", vec![1.0, 0.0, 1.0, 0.0], vec![0.9, 0.1, 0.8, 0.2]);
        let values = ["f", "f", "m", "m"];
        let prior = evaluator
            .evaluate(&[model], ProtectedInput::categorical(values, ["f", "m", "x"]), "f", &[])
            .unwrap();

        let same_values = ProtectedInput::categorical(values, ["f", "m"]).resolve().unwrap().0;
        assert!(matches!(
            validate_compatible(&same_values, "f", std::slice::from_ref(&prior)),
            Err(FairnessError::IncompatibilityError(_))
        ));

        let reordered = ProtectedInput::categorical(values, ["m", "x", "f"]).resolve().unwrap().0;
        assert!(validate_compatible(&reordered, "f", std::slice::from_ref(&prior)).is_err());

        let identical = ProtectedInput::categorical(values, ["f", "m", "x"]).resolve().unwrap().0;
        assert!(validate_compatible(&identical, "f", &[prior]).is_ok());
    }

    #[test]
    fn test_duplicate_labels() {
        let evals = vec![
            eval("lr", vec![1.0], vec![0.5]),
            eval("lr", vec![1.0], vec![0.5]),
        ];
        assert!(matches!(
            resolve_labels(None, &evals, &[]),
            Err(FairnessError::ConfigError(_))
        ));

        let explicit = vec!["lr".to_string(), "rf".to_string()];
        assert_eq!(resolve_labels(Some(&explicit), &evals, &[]).unwrap(), explicit);

        let short = vec!["lr".to_string()];
        assert!(resolve_labels(Some(&short), &evals, &[]).is_err());
    }
}
