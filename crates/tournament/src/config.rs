//! Predictor configuration
//!
//! Loaded from an optional TOML file; every field has a default, and CLI
//! flags override whatever the file sets.
//!
//! ```toml
//! name = "NCAA 2025"
//! resolver = "global"
//!
//! [report]
//! precision = 3
//! top = 16
//! show_rounds = true
//!
//! [ratings]
//! scale = 400.0
//! default_rating = 1500.0
//! ```

use bracket_core::ResolverMode;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{self, Result, TournamentError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PredictorConfig {
    /// Report title (defaults to the team list's file name)
    pub name: Option<String>,
    pub resolver: ResolverMode,
    pub report: ReportConfig,
    pub ratings: RatingsConfig,
}

/// How the text report is rendered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Decimal places for probabilities
    pub precision: usize,
    /// Only list the N most likely champions (None = everyone)
    pub top: Option<usize>,
    /// Add a column per round to the probability table
    pub show_rounds: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            precision: 4,
            top: None,
            show_rounds: false,
        }
    }
}

/// Overrides for the ratings file. Unset fields keep whatever the file
/// says, which itself falls back to 400 / 1500.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RatingsConfig {
    pub scale: Option<f64>,
    pub default_rating: Option<f64>,
}

impl PredictorConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = error::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.report.precision > 12 {
            return Err(TournamentError::InvalidSetting(format!(
                "report precision {} exceeds 12 digits",
                self.report.precision
            )));
        }
        if let Some(scale) = self.ratings.scale {
            if !(scale.is_finite() && scale > 0.0) {
                return Err(TournamentError::InvalidSetting(format!(
                    "rating scale must be positive, got {}",
                    scale
                )));
            }
        }
        if let Some(rating) = self.ratings.default_rating {
            if !rating.is_finite() {
                return Err(TournamentError::InvalidSetting(format!(
                    "default rating must be finite, got {}",
                    rating
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod config_tests;
