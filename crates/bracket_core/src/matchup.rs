//! Symmetric pairwise win-probability table.
//!
//! Each unordered pair is stored once under a canonical key (lower slot
//! first) with the probability oriented to that order. The reverse direction
//! is always derived as the complement.

use std::collections::HashMap;

use crate::error::{BracketError, Result};
use crate::types::{validate_field, Entrant, MatchupEntry, Slot};

/// Probability used for any pair with no supplied entry.
pub const DEFAULT_PROBABILITY: f64 = 0.5;

/// Two entries for the same pair closer than this are considered identical.
const DUPLICATE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone)]
pub struct MatchupTable {
    entrants: Vec<Entrant>,
    index: HashMap<String, Slot>,
    /// P(lo beats hi), keyed by (lo, hi) with lo < hi
    pairs: HashMap<(Slot, Slot), f64>,
}

impl MatchupTable {
    /// Build a table over `entrants`, validating every supplied entry.
    ///
    /// Fails fast on the first malformed entry: out-of-range or NaN values,
    /// self-matchups, conflicting duplicates, or names outside the field.
    pub fn new(entrants: &[Entrant], entries: &[MatchupEntry]) -> Result<Self> {
        validate_field(entrants)?;

        let index: HashMap<String, Slot> = entrants
            .iter()
            .enumerate()
            .map(|(slot, e)| (e.name().to_string(), slot))
            .collect();

        let mut table = Self {
            entrants: entrants.to_vec(),
            index,
            pairs: HashMap::with_capacity(entries.len()),
        };

        for entry in entries {
            table.insert(entry)?;
        }

        tracing::debug!(
            entrants = table.entrants.len(),
            pairs = table.pairs.len(),
            "matchup table built"
        );
        Ok(table)
    }

    /// Table with no supplied entries: every matchup is a coin flip.
    pub fn uniform(entrants: &[Entrant]) -> Result<Self> {
        Self::new(entrants, &[])
    }

    fn insert(&mut self, entry: &MatchupEntry) -> Result<()> {
        let (a, b, p) = (entry.a.name(), entry.b.name(), entry.probability);

        if !(0.0..=1.0).contains(&p) {
            return Err(BracketError::invalid_probability(
                a,
                b,
                format!("{} is outside [0, 1]", p),
            ));
        }
        let i = self.slot_of(a)?;
        let j = self.slot_of(b)?;
        if i == j {
            return Err(BracketError::invalid_probability(
                a,
                b,
                "an entrant cannot be matched against itself",
            ));
        }

        let (key, oriented) = if i < j { ((i, j), p) } else { ((j, i), 1.0 - p) };
        match self.pairs.get(&key) {
            Some(&existing) if (existing - oriented).abs() > DUPLICATE_TOLERANCE => {
                Err(BracketError::invalid_probability(
                    a,
                    b,
                    "pair supplied twice with conflicting values",
                ))
            }
            Some(_) => Ok(()),
            None => {
                self.pairs.insert(key, oriented);
                Ok(())
            }
        }
    }

    /// Probability that `a` beats `b`.
    pub fn probability(&self, a: &str, b: &str) -> Result<f64> {
        let i = self.slot_of(a)?;
        let j = self.slot_of(b)?;
        if i == j {
            return Err(BracketError::invalid_probability(
                a,
                b,
                "an entrant cannot be matched against itself",
            ));
        }
        Ok(self.probability_by_slot(i, j))
    }

    /// Probability that the entrant at table slot `i` beats the one at `j`.
    ///
    /// Slots must be distinct and in range; engines resolve them once through
    /// [`MatchupTable::slot_of`].
    pub fn probability_by_slot(&self, i: Slot, j: Slot) -> f64 {
        debug_assert!(i != j && i < self.entrants.len() && j < self.entrants.len());
        if i < j {
            self.pairs.get(&(i, j)).copied().unwrap_or(DEFAULT_PROBABILITY)
        } else {
            1.0 - self.pairs.get(&(j, i)).copied().unwrap_or(DEFAULT_PROBABILITY)
        }
    }

    /// Position of `name` in the field this table was built over.
    pub fn slot_of(&self, name: &str) -> Result<Slot> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| BracketError::unknown(name))
    }

    /// Whether a probability was supplied for this unordered pair.
    pub fn is_listed(&self, a: &str, b: &str) -> bool {
        match (self.index.get(a), self.index.get(b)) {
            (Some(&i), Some(&j)) => self.pairs.contains_key(&(i.min(j), i.max(j))),
            _ => false,
        }
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    /// Number of stored pairs (not counting defaulted ones).
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Stored pairs in canonical orientation, ordered by slot.
    pub fn entries(&self) -> Vec<MatchupEntry> {
        let mut keys: Vec<_> = self.pairs.keys().copied().collect();
        keys.sort_unstable();
        keys.into_iter()
            .map(|(i, j)| MatchupEntry {
                a: self.entrants[i].clone(),
                b: self.entrants[j].clone(),
                probability: self.pairs[&(i, j)],
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "matchup_tests.rs"]
mod matchup_tests;
