//! Prediction report storage and rendering

use bracket_core::{round_count, validate_field, Entrant, Prediction, ResolverMode};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::config::ReportConfig;
use crate::error::{self, Result, TournamentError};

/// Everything a presentation layer needs about one prediction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    /// Name/description of the bracket
    pub name: String,
    /// Entrants in bracket order
    pub entrants: Vec<Entrant>,
    /// How the most likely bracket was resolved
    pub resolver: ResolverMode,
    pub prediction: Prediction,
    /// Rendering options used
    pub config: ReportConfig,
}

impl PredictionReport {
    pub fn new(
        name: &str,
        entrants: Vec<Entrant>,
        resolver: ResolverMode,
        prediction: Prediction,
        config: ReportConfig,
    ) -> Self {
        Self {
            name: name.to_string(),
            entrants,
            resolver,
            prediction,
            config,
        }
    }

    /// Save report to JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        error::write(path, &json)
    }

    /// Load report from JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = error::read_to_string(path)?;
        let report: Self = serde_json::from_str(&contents)?;
        report.check()?;
        Ok(report)
    }

    /// Make sure a deserialized report describes one complete bracket over
    /// its own entrants before anything renders it.
    pub fn check(&self) -> Result<()> {
        let invalid = |reason: String| Err(TournamentError::InvalidReport(reason));
        validate_field(&self.entrants)?;
        let depth = round_count(self.entrants.len()).unwrap_or_default();

        let resolved = &self.prediction.resolved;
        if resolved.depth() != depth {
            return invalid(format!(
                "bracket depth {} does not fit {} entrants",
                resolved.depth(),
                self.entrants.len()
            ));
        }
        if resolved.games().len() != self.entrants.len() - 1 {
            return invalid(format!(
                "{} games recorded for {} entrants",
                resolved.games().len(),
                self.entrants.len()
            ));
        }
        for game in resolved.games() {
            if game.round == 0 || game.round > depth {
                return invalid(format!("game in round {} of {}", game.round, depth));
            }
            if game.winner != game.left && game.winner != game.right {
                return invalid(format!(
                    "{} wins a game between {} and {}",
                    game.winner, game.left, game.right
                ));
            }
        }
        if resolved.final_game().round != depth {
            return invalid("last game is not the final".to_string());
        }

        let marginals = &self.prediction.marginals;
        if marginals.entrants() != self.entrants.as_slice() || marginals.depth() != depth {
            return invalid("marginal table does not match the entrants".to_string());
        }
        if marginals.rows().count() != self.entrants.len()
            || marginals.rows().any(|(_, rounds)| rounds.len() != depth as usize)
        {
            return invalid("marginal row with the wrong number of rounds".to_string());
        }
        Ok(())
    }

    /// Generate a text report
    pub fn generate_report(&self) -> String {
        let prec = self.config.precision;
        let resolved = &self.prediction.resolved;
        let marginals = &self.prediction.marginals;
        let champion = resolved.champion();

        let mut report = String::new();
        report.push_str(&format!("=== Bracket: {} ===\n\n", self.name));
        report.push_str(&format!(
            "Entrants: {} ({} rounds), resolver: {}\n\n",
            self.entrants.len(),
            resolved.depth(),
            match self.resolver {
                ResolverMode::Greedy => "greedy",
                ResolverMode::Global => "global",
            }
        ));

        report.push_str(&format!("Most likely champion: {}\n", champion));
        report.push_str(&format!(
            "  bracket probability:       {:.prec$e}\n",
            resolved.chain_probability()
        ));
        report.push_str(&format!(
            "  champion path probability: {:.prec$}\n",
            resolved.champion_path_probability()
        ));
        report.push_str(&format!(
            "  championship probability:  {:.prec$}\n\n",
            marginals.championship(champion.name()).unwrap_or(0.0)
        ));

        let width = (prec + 4).max(8);
        report.push_str("Probability each team wins:\n");
        let mut header = format!("{:<30}", "Team");
        if self.config.show_rounds {
            for round in 1..resolved.depth() {
                header.push_str(&format!(" {:>width$}", format!("R{}", round)));
            }
        }
        header.push_str(&format!(" {:>width$}", "Champion"));
        report.push_str(&header);
        report.push('\n');
        report.push_str(&"-".repeat(header.len()));
        report.push('\n');

        let distribution = marginals.champion_distribution();
        let shown = self.config.top.unwrap_or(distribution.len());
        for (entrant, p) in distribution.into_iter().take(shown) {
            let mut line = format!("{:<30}", entrant.name());
            if self.config.show_rounds {
                let rounds = marginals.advancement(entrant.name()).unwrap_or_default();
                for q in rounds.iter().take(rounds.len().saturating_sub(1)) {
                    line.push_str(&format!(" {:>width$.prec$}", q));
                }
            }
            line.push_str(&format!(" {:>width$.prec$}", p));
            report.push_str(&line);
            report.push('\n');
        }

        report.push_str("\nPredicted match results:\n");
        for game in resolved.games() {
            report.push_str(&format!(
                "Round {}: {} vs {} -> {} (p={:.prec$})\n",
                game.round, game.left, game.right, game.winner, game.game_probability
            ));
        }

        report
    }

    /// Print report to stdout
    pub fn print_report(&self) {
        println!("{}", self.generate_report());
    }
}

#[cfg(test)]
#[path = "results_tests.rs"]
mod results_tests;
