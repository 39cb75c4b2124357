//! File inputs to finished report

use bracket_core::Prediction;
use std::path::PathBuf;

use crate::config::PredictorConfig;
use crate::elo::RatingTable;
use crate::error::Result;
use crate::results::PredictionReport;
use crate::sources::{merge_matchups, read_entrants, read_matchups};

/// Files a prediction is built from
#[derive(Debug, Clone)]
pub struct PredictionInputs {
    /// Entrant list, one name per line in bracket order
    pub teams: PathBuf,
    /// Pairwise probability CSV
    pub probs: Option<PathBuf>,
    /// Elo ratings used for pairs the CSV leaves out
    pub ratings: Option<PathBuf>,
}

/// Load every input, validate it and run both engines.
///
/// Nothing is computed until all inputs have been read and the matchup
/// table has been validated.
pub fn run_prediction(
    inputs: &PredictionInputs,
    config: &PredictorConfig,
) -> Result<PredictionReport> {
    config.validate()?;
    let entrants = read_entrants(&inputs.teams)?;

    let explicit = match &inputs.probs {
        Some(path) => read_matchups(path)?,
        None => Vec::new(),
    };
    let listed = explicit.len();

    let entries = match &inputs.ratings {
        Some(path) => {
            let ratings = RatingTable::load(path)?
                .with_settings(config.ratings.default_rating, config.ratings.scale)?;
            let unrated = ratings.unrated(&entrants);
            if !unrated.is_empty() {
                tracing::warn!(
                    count = unrated.len(),
                    default = ratings.default_rating,
                    "entrants without a rating use the default"
                );
            }
            merge_matchups(explicit, ratings.matchups(&entrants))
        }
        None => explicit,
    };

    tracing::info!(
        entrants = entrants.len(),
        listed,
        total = entries.len(),
        resolver = ?config.resolver,
        "running prediction"
    );
    let prediction = Prediction::compute_with(&entrants, &entries, config.resolver)?;

    let name = config.name.clone().unwrap_or_else(|| {
        inputs
            .teams
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "bracket".to_string())
    });
    Ok(PredictionReport::new(
        &name,
        entrants,
        config.resolver,
        prediction,
        config.report.clone(),
    ))
}

#[cfg(test)]
#[path = "predict_tests.rs"]
mod predict_tests;
