//! Bracket structure: a perfect binary tree over the ordered field.
//!
//! Nodes live in a flat arena in bottom-up order. Leaves come first in slot
//! order, then every game of round 1, then round 2, and so on up to the
//! final. A child therefore always has a smaller id than its parent, and a
//! forward pass over [`BracketTree::nodes`] visits nodes in post-order.

use serde::{Deserialize, Serialize};
use std::ops::Range;

use crate::error::Result;
use crate::types::{round_count, validate_field, Entrant, Slot};

/// Index of a node in the tree's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(pub usize);

#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A first-round seed; no game is played here.
    Leaf { entrant: Entrant },
    /// A game between the winners of two sub-brackets.
    Game { left: NodeId, right: NodeId },
}

#[derive(Clone, Debug, PartialEq)]
pub struct BracketNode {
    pub id: NodeId,
    /// 0 for leaves, 1 for first-round games, up to the tree depth for the final
    pub round: u32,
    /// Bracket slots covered by this subtree
    pub slots: Range<Slot>,
    pub kind: NodeKind,
}

impl BracketNode {
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    pub fn entrant(&self) -> Option<&Entrant> {
        match &self.kind {
            NodeKind::Leaf { entrant } => Some(entrant),
            NodeKind::Game { .. } => None,
        }
    }

    pub fn children(&self) -> Option<(NodeId, NodeId)> {
        match self.kind {
            NodeKind::Leaf { .. } => None,
            NodeKind::Game { left, right } => Some((left, right)),
        }
    }

    /// Number of entrants that can reach this node.
    pub fn span(&self) -> usize {
        self.slots.len()
    }
}

#[derive(Clone, Debug)]
pub struct BracketTree {
    nodes: Vec<BracketNode>,
    entrants: Vec<Entrant>,
    depth: u32,
}

impl BracketTree {
    /// Build the bracket for `entrants` in slot order.
    ///
    /// Slots 0 and 1 meet in round 1, their winner meets the winner of slots
    /// 2 and 3 in round 2, and so on.
    pub fn build(entrants: &[Entrant]) -> Result<Self> {
        validate_field(entrants)?;
        let depth = round_count(entrants.len()).unwrap_or_default();

        let mut nodes = Vec::with_capacity(2 * entrants.len() - 1);
        let mut level: Vec<NodeId> = Vec::with_capacity(entrants.len());
        for (slot, entrant) in entrants.iter().enumerate() {
            let id = NodeId(nodes.len());
            nodes.push(BracketNode {
                id,
                round: 0,
                slots: slot..slot + 1,
                kind: NodeKind::Leaf {
                    entrant: entrant.clone(),
                },
            });
            level.push(id);
        }

        let mut round = 0;
        while level.len() > 1 {
            round += 1;
            let mut next = Vec::with_capacity(level.len() / 2);
            for pair in level.chunks_exact(2) {
                let (left, right) = (pair[0], pair[1]);
                let id = NodeId(nodes.len());
                let slots = nodes[left.0].slots.start..nodes[right.0].slots.end;
                nodes.push(BracketNode {
                    id,
                    round,
                    slots,
                    kind: NodeKind::Game { left, right },
                });
                next.push(id);
            }
            level = next;
        }
        debug_assert_eq!(round, depth);

        tracing::debug!(entrants = entrants.len(), depth, "bracket tree built");
        Ok(Self {
            nodes,
            entrants: entrants.to_vec(),
            depth,
        })
    }

    /// All nodes, children before parents.
    pub fn nodes(&self) -> &[BracketNode] {
        &self.nodes
    }

    pub fn node(&self, id: NodeId) -> &BracketNode {
        &self.nodes[id.0]
    }

    /// The championship game.
    pub fn root(&self) -> &BracketNode {
        // build() always creates at least one game
        &self.nodes[self.nodes.len() - 1]
    }

    /// Number of rounds (k for a field of 2^k).
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of entrants.
    pub fn len(&self) -> usize {
        self.entrants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entrants.is_empty()
    }

    pub fn entrants(&self) -> &[Entrant] {
        &self.entrants
    }

    pub fn entrant(&self, slot: Slot) -> Option<&Entrant> {
        self.entrants.get(slot)
    }

    pub fn leaves(&self) -> impl Iterator<Item = &BracketNode> {
        self.nodes[..self.entrants.len()].iter()
    }

    pub fn games(&self) -> impl Iterator<Item = &BracketNode> {
        self.nodes[self.entrants.len()..].iter()
    }

    pub fn game_count(&self) -> usize {
        self.nodes.len() - self.entrants.len()
    }

    pub fn games_in_round(&self, round: u32) -> impl Iterator<Item = &BracketNode> {
        self.games().filter(move |node| node.round == round)
    }
}

#[cfg(test)]
#[path = "tree_tests.rs"]
mod tree_tests;
