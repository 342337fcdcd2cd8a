//! Kolosal Fairness - Main Entry Point
//!
//! Computes, merges and prints group fairness checks from the command line.

use clap::Parser;
use kolosal_fairness::cli::{cmd_check, cmd_show, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kolosal_fairness=info".into()),
        )
        .with_target(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Check {
            input,
            merge,
            cutoff,
            epsilon,
            output,
            quiet,
            no_color,
        } => {
            cmd_check(
                &input,
                &merge,
                cutoff.as_deref(),
                epsilon,
                output.as_deref(),
                quiet,
                no_color,
            )?;
        }
        Commands::Show { object, no_color } => {
            cmd_show(&object, no_color)?;
        }
    }

    Ok(())
}
