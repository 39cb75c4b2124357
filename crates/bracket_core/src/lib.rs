//! Bracket prediction core
//!
//! Given an ordered field of 2^k entrants and pairwise win probabilities,
//! this crate computes:
//! - the most likely complete bracket ([`MostLikelyResolver`])
//! - each entrant's exact probability of winning every round
//!   ([`MarginalProbabilityEngine`])
//!
//! Everything here is a pure function of the inputs. No I/O, no randomness.
//!
//! # Usage
//!
//! ```
//! use bracket_core::{Entrant, MatchupEntry, Prediction};
//!
//! let teams: Vec<Entrant> = ["A", "B"].into_iter().map(Entrant::from).collect();
//! let entries = [MatchupEntry::new("A", "B", 0.9)];
//! let prediction = Prediction::compute(&teams, &entries).unwrap();
//! assert_eq!(prediction.resolved.champion().name(), "A");
//! ```

pub mod error;
pub mod marginals;
pub mod matchup;
pub mod resolver;
pub mod tree;
pub mod types;

pub use error::{BracketError, Result};
pub use marginals::{
    MarginalProbabilityEngine, MarginalWinTable, NodeDistribution, MASS_TOLERANCE,
};
pub use matchup::{MatchupTable, DEFAULT_PROBABILITY};
pub use resolver::{MostLikelyResolver, ResolvedBracket, ResolvedGame, ResolverMode};
pub use tree::{BracketNode, BracketTree, NodeId, NodeKind};
pub use types::*;

use serde::{Deserialize, Serialize};

// =============================================================================
// Prediction: both engines over one input
// =============================================================================

/// Most likely bracket plus marginal win table for one field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub resolved: ResolvedBracket,
    pub marginals: MarginalWinTable,
}

impl Prediction {
    /// Validate the inputs and run both engines.
    ///
    /// Any malformed input fails here, before either engine produces output.
    pub fn compute(entrants: &[Entrant], entries: &[MatchupEntry]) -> Result<Self> {
        Self::compute_with(entrants, entries, ResolverMode::Greedy)
    }

    pub fn compute_with(
        entrants: &[Entrant],
        entries: &[MatchupEntry],
        mode: ResolverMode,
    ) -> Result<Self> {
        let table = MatchupTable::new(entrants, entries)?;
        let tree = BracketTree::build(entrants)?;
        Self::from_parts(&tree, &table, mode)
    }

    /// Run both engines over an already built tree and table.
    pub fn from_parts(
        tree: &BracketTree,
        table: &MatchupTable,
        mode: ResolverMode,
    ) -> Result<Self> {
        let resolved = MostLikelyResolver::resolve_with(mode, tree, table)?;
        let marginals = MarginalProbabilityEngine::marginals(tree, table)?;
        Ok(Self {
            resolved,
            marginals,
        })
    }

    pub fn champion(&self) -> &Entrant {
        self.resolved.champion()
    }
}
