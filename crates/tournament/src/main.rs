//! Bracket CLI
//!
//! Predict a single-elimination bracket and report each entrant's odds.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tournament::{run_prediction, PredictionInputs, PredictionReport, PredictorConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "bracket", version, about = "Single-elimination bracket predictor")]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Predict the most likely bracket and every entrant's odds
    Predict {
        /// Entrant list, one name per line in bracket order
        #[arg(long)]
        teams: PathBuf,

        /// CSV of `team_a,team_b,probability` rows
        #[arg(long)]
        probs: Option<PathBuf>,

        /// Elo ratings JSON used for pairs the CSV leaves out
        #[arg(long)]
        ratings: Option<PathBuf>,

        /// Predictor configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Save the full report as JSON
        #[arg(long)]
        json: Option<PathBuf>,

        /// Show per-round advancement odds
        #[arg(long)]
        rounds: bool,

        /// Only list the N most likely champions
        #[arg(long)]
        top: Option<usize>,

        /// Pick the bracket with the highest overall probability
        #[arg(long)]
        global: bool,

        /// Name shown in the report header
        #[arg(long)]
        name: Option<String>,
    },

    /// Print a saved JSON report
    Show {
        report: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Predict {
            teams,
            probs,
            ratings,
            config,
            json,
            rounds,
            top,
            global,
            name,
        } => {
            let mut config = match config {
                Some(path) => PredictorConfig::load(&path)
                    .with_context(|| format!("failed to load config {}", path.display()))?,
                None => PredictorConfig::default(),
            };
            if rounds {
                config.report.show_rounds = true;
            }
            if top.is_some() {
                config.report.top = top;
            }
            if global {
                config.resolver = bracket_core::ResolverMode::Global;
            }
            if name.is_some() {
                config.name = name;
            }

            let inputs = PredictionInputs {
                teams,
                probs,
                ratings,
            };
            let report = run_prediction(&inputs, &config).context("prediction failed")?;
            report.print_report();

            if let Some(path) = json {
                report
                    .save(&path)
                    .with_context(|| format!("failed to save report {}", path.display()))?;
                tracing::info!(path = %path.display(), "report saved");
            }
        }
        Command::Show { report } => {
            let loaded = PredictionReport::load(&report)
                .with_context(|| format!("failed to load report {}", report.display()))?;
            loaded.print_report();
        }
    }

    Ok(())
}
