//! Kolosal Fairness CLI Module
//!
//! Command-line interface for computing, merging and inspecting fairness objects.

use clap::{Parser, Subcommand};
use colored::*;
use ndarray::Array1;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::fairness::{
    AttributeValue, CheckStatus, Cutoff, FairnessConfig, FairnessEvaluator, FairnessObject,
    Metric, ModelEvaluation, ProtectedInput,
};

// ─── Styling helpers ───────────────────────────────────────────────────────────

fn dim(s: &str) -> ColoredString   { s.truecolor(100, 100, 100) }
fn muted(s: &str) -> ColoredString { s.truecolor(140, 140, 140) }
fn ok(s: &str) -> ColoredString    { s.truecolor(100, 210, 120) }
fn bad(s: &str) -> ColoredString   { s.truecolor(230, 100, 100) }
fn warn(s: &str) -> ColoredString  { s.truecolor(230, 180, 80) }

fn section(title: &str) {
    println!();
    println!("  {}", title.white().bold());
    println!("  {}", dim(&"─".repeat(56)));
}

fn kv(key: &str, val: &str) {
    println!("  {:<12} {}", muted(key), val.white());
}

fn fmt_score(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| format!("{:.3}", v))
}

// ─── CLI definition ────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "kolosal-fairness")]
#[command(author = "KolosalAI")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Group fairness checks for binary classifiers")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compute fairness metrics for the models in an input file
    Check {
        /// Input JSON file with protected, privileged and models
        #[arg(short, long)]
        input: PathBuf,

        /// Saved fairness objects to merge in (repeatable)
        #[arg(short, long)]
        merge: Vec<PathBuf>,

        /// Cutoff, a single value or one per level (comma separated)
        #[arg(short, long)]
        cutoff: Option<String>,

        /// Fairness boundary
        #[arg(short, long)]
        epsilon: Option<f64>,

        /// Save the resulting fairness object
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Suppress advisory messages
        #[arg(short, long)]
        quiet: bool,

        /// Disable coloured output
        #[arg(long)]
        no_color: bool,
    },

    /// Print the fairness check of a saved fairness object
    Show {
        /// Fairness object file
        #[arg(short, long)]
        object: PathBuf,

        /// Disable coloured output
        #[arg(long)]
        no_color: bool,
    },
}

// ─── Input loading ─────────────────────────────────────────────────────────────

/// One model in the input file
#[derive(Debug, Deserialize)]
pub struct InputModel {
    pub label: String,
    pub y: Vec<f64>,
    pub y_hat: Vec<f64>,
}

/// Layout of the `check` input file
#[derive(Debug, Deserialize)]
pub struct CheckInput {
    pub protected: ProtectedInput,
    pub privileged: AttributeValue,
    pub models: Vec<InputModel>,
}

impl CheckInput {
    pub fn evaluations(&self) -> Vec<ModelEvaluation> {
        self.models
            .iter()
            .map(|m| {
                ModelEvaluation::new(
                    m.label.clone(),
                    Array1::from(m.y.clone()),
                    Array1::from(m.y_hat.clone()),
                )
            })
            .collect()
    }
}

pub fn load_input(path: &Path) -> anyhow::Result<CheckInput> {
    let file = File::open(path)?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}

/// Parse `0.5` or `0.4,0.6` into a cutoff
pub fn parse_cutoff(raw: &str) -> anyhow::Result<Cutoff> {
    let values = raw
        .split(',')
        .map(|s| s.trim().parse::<f64>())
        .collect::<Result<Vec<f64>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid cutoff '{}': {}", raw, e))?;
    Ok(match values.as_slice() {
        [single] => Cutoff::Scalar(*single),
        _ => Cutoff::PerLevel(values),
    })
}

// ─── Commands ──────────────────────────────────────────────────────────────────

pub fn cmd_check(
    input: &Path,
    merge: &[PathBuf],
    cutoff: Option<&str>,
    epsilon: Option<f64>,
    output: Option<&Path>,
    quiet: bool,
    no_color: bool,
) -> anyhow::Result<()> {
    colored::control::set_override(!no_color);

    let input = load_input(input)?;
    let priors = merge
        .iter()
        .map(FairnessObject::load)
        .collect::<Result<Vec<_>, _>>()?;

    let mut config = FairnessConfig::default()
        .with_verbose(!quiet)
        .with_colorize(!no_color);
    if let Some(raw) = cutoff {
        config = config.with_cutoff(parse_cutoff(raw)?);
    }
    if let Some(eps) = epsilon {
        config = config.with_epsilon(eps);
    }

    let evaluator = FairnessEvaluator::new(config);
    let fobject = evaluator.evaluate(
        &input.evaluations(),
        input.protected.clone(),
        input.privileged.clone(),
        &priors,
    )?;

    print_fairness_check(&fobject);
    print_parity_loss(&fobject);

    if let Some(path) = output {
        fobject.save(path)?;
        println!("  {} {}", ok("saved"), dim(&path.display().to_string()));
        println!();
    }

    Ok(())
}

pub fn cmd_show(object: &Path, no_color: bool) -> anyhow::Result<()> {
    colored::control::set_override(!no_color);

    let fobject = FairnessObject::load(object)?;
    print_fairness_check(&fobject);
    print_parity_loss(&fobject);
    Ok(())
}

// ─── Rendering ─────────────────────────────────────────────────────────────────

pub fn print_fairness_check(fobject: &FairnessObject) {
    section("Fairness check");
    kv("Privileged", fobject.privileged());
    let protected = fobject.protected();
    let levels: Vec<String> = protected
        .levels()
        .iter()
        .zip(protected.level_counts())
        .map(|(level, n)| format!("{} ({})", level, n))
        .collect();
    kv("Levels", &levels.join(", "));
    kv("Epsilon", &format!("{}", fobject.epsilon()));
    kv("Models", &fobject.labels().join(", "));

    for summary in fobject.check_summary() {
        println!();
        let verdict = format!("passes {}/{} metrics", summary.passed, summary.metrics.len());
        let verdict = if summary.passed == summary.metrics.len() {
            ok(&verdict)
        } else {
            warn(&verdict)
        };
        println!("  {} {}", summary.label.white().bold(), verdict);

        for check in &summary.metrics {
            let (mark, detail) = match check.status {
                CheckStatus::Passed => (ok("✓"), String::new()),
                CheckStatus::Failed => (bad("✗"), check.failing_subgroups.join(", ")),
                CheckStatus::NotEvaluable => (warn("?"), check.missing_subgroups.join(", ")),
            };
            println!("    {} {}  {}", mark, muted(&check.description), dim(&detail));
        }
    }

    if fobject.missing_values() {
        println!();
        println!("  {} {}", warn("!"), muted("some metrics produced missing values (NA)"));
    }
}

pub fn print_parity_loss(fobject: &FairnessObject) {
    section("Parity loss");

    let header: String = Metric::ALL.iter().map(|m| format!("{:>7}", m.name())).collect();
    println!("  {:<16}{}", muted("Model"), muted(&header));
    println!("  {}", dim(&"─".repeat(16 + 7 * Metric::ALL.len())));

    for row in fobject.parity_loss() {
        let cells: String = Metric::ALL
            .iter()
            .map(|&m| format!("{:>7}", fmt_score(row.parity_loss.get(m))))
            .collect();
        println!("  {:<16}{}", row.label, cells);
    }
    println!();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cutoff() {
        assert_eq!(parse_cutoff("0.5").unwrap(), Cutoff::Scalar(0.5));
        assert_eq!(parse_cutoff("0.4, 0.6").unwrap(), Cutoff::PerLevel(vec![0.4, 0.6]));
        assert!(parse_cutoff("high").is_err());
    }

    #[test]
    fn test_input_layout() {
        let json = r#"{
            "protected": ["male", "male", "female", "female"],
            "privileged": "male",
            "models": [{"label": "lr", "y": [1, 0, 1, 0], "y_hat": [0.6, 0.4, 0.7, 0.3]}]
        }"#;
        let input: CheckInput = serde_json::from_str(json).unwrap();
        assert!(matches!(input.protected, ProtectedInput::Raw(_)));
        let evals = input.evaluations();
        assert_eq!(evals[0].label, "lr");
        assert_eq!(evals[0].y[0], 1.0);
    }

    #[test]
    fn test_categorical_input_layout() {
        let json = r#"{
            "protected": {"values": ["a", "b"], "levels": ["b", "a"]},
            "privileged": 1,
            "models": []
        }"#;
        let input: CheckInput = serde_json::from_str(json).unwrap();
        assert!(matches!(input.protected, ProtectedInput::Categorical { .. }));
        assert_eq!(input.privileged, AttributeValue::Integer(1));
    }

    #[test]
    fn test_fmt_score() {
        assert_eq!(fmt_score(None), "NA");
        assert_eq!(fmt_score(Some(0.12345)), "0.123");
    }
}
