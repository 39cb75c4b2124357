//! Exact marginal win probabilities.
//!
//! Unlike [`crate::resolver`], which keeps a single best chain per node, this
//! pass keeps the full distribution over every entrant that can still win
//! each subtree and sums over all ways of getting there.
//!
//! The entrants able to win a subtree are exactly the slots it covers, so a
//! node's distribution is a dense vector indexed by offset into its slot
//! range. Contributions are accumulated in slot order, which makes repeated
//! runs bit-identical.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::error::Result;
use crate::matchup::MatchupTable;
use crate::tree::{BracketTree, NodeId, NodeKind};
use crate::types::{Entrant, Slot};

/// Allowed drift of a node's total probability mass away from 1.
pub const MASS_TOLERANCE: f64 = 1e-9;

/// Distribution over the possible winners of one subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDistribution {
    pub node: NodeId,
    pub round: u32,
    pub first_slot: Slot,
    /// Probability of winning the subtree, for each covered slot in order
    pub probabilities: Vec<f64>,
}

impl NodeDistribution {
    pub fn total(&self) -> f64 {
        self.probabilities.iter().sum()
    }

    pub fn get(&self, slot: Slot) -> Option<f64> {
        slot.checked_sub(self.first_slot)
            .and_then(|offset| self.probabilities.get(offset))
            .copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Slot, f64)> + '_ {
        self.probabilities
            .iter()
            .enumerate()
            .map(move |(offset, &p)| (self.first_slot + offset, p))
    }
}

/// Per-entrant probability of winning each round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredWinTable")]
pub struct MarginalWinTable {
    entrants: Vec<Entrant>,
    depth: u32,
    /// `rounds[slot][r - 1]` is the probability that the entrant wins round r
    rounds: Vec<Vec<f64>>,
    #[serde(skip_serializing)]
    index: HashMap<String, Slot>,
}

/// Serialized form; the name index is rebuilt on load.
#[derive(Deserialize)]
struct StoredWinTable {
    entrants: Vec<Entrant>,
    depth: u32,
    rounds: Vec<Vec<f64>>,
}

impl From<StoredWinTable> for MarginalWinTable {
    fn from(stored: StoredWinTable) -> Self {
        Self::new(stored.entrants, stored.depth, stored.rounds)
    }
}

impl MarginalWinTable {
    fn new(entrants: Vec<Entrant>, depth: u32, rounds: Vec<Vec<f64>>) -> Self {
        let index = entrants
            .iter()
            .enumerate()
            .map(|(slot, e)| (e.name().to_string(), slot))
            .collect();
        Self {
            entrants,
            depth,
            rounds,
            index,
        }
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    fn slot_of(&self, name: &str) -> Option<Slot> {
        self.index.get(name).copied()
    }

    /// Probability of winning every round, in order; the last entry is the
    /// championship.
    pub fn advancement(&self, name: &str) -> Option<&[f64]> {
        self.slot_of(name).and_then(|slot| self.advancement_by_slot(slot))
    }

    pub fn advancement_by_slot(&self, slot: Slot) -> Option<&[f64]> {
        self.rounds.get(slot).map(Vec::as_slice)
    }

    /// Probability that `name` wins its game in `round` (1-based).
    pub fn round_probability(&self, name: &str, round: u32) -> Option<f64> {
        let idx = (round as usize).checked_sub(1)?;
        self.advancement(name)?.get(idx).copied()
    }

    /// Probability that `name` wins the tournament.
    pub fn championship(&self, name: &str) -> Option<f64> {
        self.advancement(name)?.last().copied()
    }

    /// Expected number of games won.
    pub fn expected_wins(&self, name: &str) -> Option<f64> {
        self.advancement(name).map(|rounds| rounds.iter().sum())
    }

    /// Championship probabilities, most likely first. Equal values keep
    /// bracket order.
    pub fn champion_distribution(&self) -> Vec<(&Entrant, f64)> {
        let mut out: Vec<(&Entrant, f64)> = self
            .entrants
            .iter()
            .zip(&self.rounds)
            .map(|(entrant, rounds)| (entrant, rounds.last().copied().unwrap_or(0.0)))
            .collect();
        out.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        out
    }

    /// Entrants with their per-round probabilities, in bracket order.
    pub fn rows(&self) -> impl Iterator<Item = (&Entrant, &[f64])> {
        self.entrants
            .iter()
            .zip(self.rounds.iter().map(Vec::as_slice))
    }
}

pub struct MarginalProbabilityEngine;

impl MarginalProbabilityEngine {
    /// Winner distribution of every node in `tree`, indexed by node id.
    ///
    /// For a game with children L and R, every pair (x from L, y from R)
    /// contributes `P(x wins L) * P(y wins R) * P(x beats y)` to x and the
    /// complementary term to y.
    pub fn distributions(
        tree: &BracketTree,
        table: &MatchupTable,
    ) -> Result<Vec<NodeDistribution>> {
        let table_slots = tree
            .entrants()
            .iter()
            .map(|e| table.slot_of(e.name()))
            .collect::<Result<Vec<Slot>>>()?;

        let mut dists: Vec<NodeDistribution> = Vec::with_capacity(tree.nodes().len());
        for node in tree.nodes() {
            let probabilities = match node.kind {
                NodeKind::Leaf { .. } => vec![1.0],
                NodeKind::Game { left, right } => {
                    let l = &dists[left.0];
                    let r = &dists[right.0];
                    let split = l.probabilities.len();
                    let mut out = vec![0.0; split + r.probabilities.len()];

                    for (x, px) in l.iter() {
                        for (y, py) in r.iter() {
                            let p = table.probability_by_slot(table_slots[x], table_slots[y]);
                            let joint = px * py;
                            out[x - l.first_slot] += joint * p;
                            out[split + (y - r.first_slot)] += joint * (1.0 - p);
                        }
                    }
                    out
                }
            };

            let dist = NodeDistribution {
                node: node.id,
                round: node.round,
                first_slot: node.slots.start,
                probabilities,
            };
            debug_assert!(
                (dist.total() - 1.0).abs() < MASS_TOLERANCE,
                "node {:?} carries mass {}",
                dist.node,
                dist.total()
            );
            dists.push(dist);
        }
        Ok(dists)
    }

    /// Probability of every entrant winning every round.
    pub fn marginals(tree: &BracketTree, table: &MatchupTable) -> Result<MarginalWinTable> {
        let dists = Self::distributions(tree, table)?;
        let depth = tree.depth();

        let mut rounds = vec![vec![0.0; depth as usize]; tree.len()];
        for dist in dists.iter().filter(|d| d.round > 0) {
            for (slot, p) in dist.iter() {
                rounds[slot][dist.round as usize - 1] = p;
            }
        }

        let root_mass = dists.last().map(NodeDistribution::total).unwrap_or(0.0);
        if (root_mass - 1.0).abs() > MASS_TOLERANCE {
            tracing::warn!(root_mass, "championship distribution does not sum to 1");
        }
        tracing::debug!(entrants = tree.len(), depth, root_mass, "marginals computed");

        Ok(MarginalWinTable::new(tree.entrants().to_vec(), depth, rounds))
    }
}

#[cfg(test)]
#[path = "marginals_tests.rs"]
mod marginals_tests;
