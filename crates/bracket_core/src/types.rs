use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::error::{BracketError, Result};

/// Opaque entrant identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entrant(String);

impl Entrant {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Entrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Entrant {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Entrant {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl AsRef<str> for Entrant {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// One supplied matchup: probability that `a` beats `b`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MatchupEntry {
    pub a: Entrant,
    pub b: Entrant,
    pub probability: f64,
}

impl MatchupEntry {
    pub fn new(a: impl Into<Entrant>, b: impl Into<Entrant>, probability: f64) -> Self {
        Self {
            a: a.into(),
            b: b.into(),
            probability,
        }
    }
}

/// Index of an entrant's position in the bracket (0-based, left to right).
pub type Slot = usize;

/// Number of rounds for a field of `count` entrants, if the size is valid.
pub fn round_count(count: usize) -> Option<u32> {
    if count >= 2 && count.is_power_of_two() {
        Some(count.trailing_zeros())
    } else {
        None
    }
}

/// Check that a field has a power-of-two size and no repeated identifiers.
pub fn validate_field(entrants: &[Entrant]) -> Result<()> {
    if round_count(entrants.len()).is_none() {
        return Err(BracketError::InvalidFieldSize {
            count: entrants.len(),
        });
    }
    let mut seen = HashSet::with_capacity(entrants.len());
    for entrant in entrants {
        if !seen.insert(entrant.name()) {
            return Err(BracketError::DuplicateEntrant {
                name: entrant.name().to_string(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;
