//! Elo ratings as a source of matchup probabilities

use bracket_core::{Entrant, MatchupEntry};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

use crate::error::{self, Result, TournamentError};

/// Rating assumed for entrants missing from the ratings file
pub const DEFAULT_ELO: f64 = 1500.0;

/// Rating gap at which the stronger side is a 10:1 favorite
pub const ELO_SCALE: f64 = 400.0;

/// Ratings for a field of entrants.
///
/// Stored as JSON: `{"ratings": {"Gonzaga": 1712.5, "Baylor": 1690.0}}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RatingTable {
    pub ratings: HashMap<String, f64>,
    #[serde(default = "default_rating")]
    pub default_rating: f64,
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_rating() -> f64 {
    DEFAULT_ELO
}

fn default_scale() -> f64 {
    ELO_SCALE
}

impl Default for RatingTable {
    fn default() -> Self {
        Self::new()
    }
}

impl RatingTable {
    pub fn new() -> Self {
        Self {
            ratings: HashMap::new(),
            default_rating: DEFAULT_ELO,
            scale: ELO_SCALE,
        }
    }

    /// Load ratings from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = error::read_to_string(path)?;
        let table: Self = serde_json::from_str(&contents)?;
        table.validate()?;
        Ok(table)
    }

    /// Save ratings to a JSON file
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        error::write(path, &json)
    }

    fn validate(&self) -> Result<()> {
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(TournamentError::InvalidSetting(format!(
                "rating scale must be positive, got {}",
                self.scale
            )));
        }
        if !self.default_rating.is_finite() {
            return Err(TournamentError::InvalidSetting(
                "default rating must be finite".to_string(),
            ));
        }
        if let Some((name, rating)) = self.ratings.iter().find(|(_, r)| !r.is_finite()) {
            return Err(TournamentError::InvalidSetting(format!(
                "rating for {} is not finite: {}",
                name, rating
            )));
        }
        Ok(())
    }

    /// Apply configured overrides; `None` keeps the current value
    pub fn with_settings(
        mut self,
        default_rating: Option<f64>,
        scale: Option<f64>,
    ) -> Result<Self> {
        if let Some(rating) = default_rating {
            self.default_rating = rating;
        }
        if let Some(scale) = scale {
            self.scale = scale;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn set_rating(&mut self, entrant: &str, rating: f64) {
        self.ratings.insert(entrant.to_string(), rating);
    }

    /// Rating for an entrant, or the default if unrated
    pub fn rating(&self, entrant: &str) -> f64 {
        self.ratings
            .get(entrant)
            .copied()
            .unwrap_or(self.default_rating)
    }

    /// Expected score of `a` against `b`, used as P(a beats b)
    pub fn expected_score(&self, a: &str, b: &str) -> f64 {
        let ra = self.rating(a);
        let rb = self.rating(b);
        1.0 / (1.0 + 10.0_f64.powf((rb - ra) / self.scale))
    }

    /// One entry per unordered pair of the field, in bracket order
    pub fn matchups(&self, entrants: &[Entrant]) -> Vec<MatchupEntry> {
        let n = entrants.len();
        let mut entries = Vec::with_capacity(n * n.saturating_sub(1) / 2);
        for (i, a) in entrants.iter().enumerate() {
            for b in &entrants[i + 1..] {
                entries.push(MatchupEntry {
                    a: a.clone(),
                    b: b.clone(),
                    probability: self.expected_score(a.name(), b.name()),
                });
            }
        }
        entries
    }

    /// Entrants of the field that have no rating of their own
    pub fn unrated<'a>(&self, entrants: &'a [Entrant]) -> Vec<&'a Entrant> {
        entrants
            .iter()
            .filter(|e| !self.ratings.contains_key(e.name()))
            .collect()
    }
}

#[cfg(test)]
#[path = "elo_tests.rs"]
mod elo_tests;
