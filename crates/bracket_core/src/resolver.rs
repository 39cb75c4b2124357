//! Maximum-likelihood bracket.
//!
//! Bottom-up arg-max over the tree: every node keeps only the single most
//! probable winner of its subtree together with the probability of the
//! fully determined set of results that produces it.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::matchup::MatchupTable;
use crate::tree::{BracketTree, NodeId, NodeKind};
use crate::types::{Entrant, Slot};

/// Predicted result of one game in the most likely bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedGame {
    pub node: NodeId,
    pub round: u32,
    /// Predicted winner of the left sub-bracket
    pub left: Entrant,
    /// Predicted winner of the right sub-bracket
    pub right: Entrant,
    pub winner: Entrant,
    /// Bracket slot of the winner
    pub winner_slot: Slot,
    /// Probability that the winner beats this particular opponent
    pub game_probability: f64,
    /// Probability of every result in this subtree, as predicted
    pub chain_probability: f64,
    /// Product of the winner's own game probabilities in this subtree
    pub path_probability: f64,
}

impl ResolvedGame {
    pub fn loser(&self) -> &Entrant {
        if self.winner == self.left {
            &self.right
        } else {
            &self.left
        }
    }
}

/// The single most probable complete outcome of a bracket.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedBracket {
    depth: u32,
    /// One entry per game, in tree order (round 1 first, final last)
    games: Vec<ResolvedGame>,
    /// Arena id of the first game node
    first_game: usize,
}

impl ResolvedBracket {
    pub fn champion(&self) -> &Entrant {
        &self.final_game().winner
    }

    /// Probability of the whole predicted bracket.
    pub fn chain_probability(&self) -> f64 {
        self.final_game().chain_probability
    }

    /// Probability that the champion wins each of its own games as predicted.
    pub fn champion_path_probability(&self) -> f64 {
        self.final_game().path_probability
    }

    pub fn final_game(&self) -> &ResolvedGame {
        // A valid field always has at least one game
        &self.games[self.games.len() - 1]
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn games(&self) -> &[ResolvedGame] {
        &self.games
    }

    pub fn game(&self, node: NodeId) -> Option<&ResolvedGame> {
        node.0
            .checked_sub(self.first_game)
            .and_then(|idx| self.games.get(idx))
    }

    pub fn games_in_round(&self, round: u32) -> impl Iterator<Item = &ResolvedGame> {
        self.games.iter().filter(move |g| g.round == round)
    }

    /// Predicted winners grouped by round, left to right.
    pub fn rounds(&self) -> Vec<Vec<&Entrant>> {
        (1..=self.depth)
            .map(|round| self.games_in_round(round).map(|g| &g.winner).collect())
            .collect()
    }
}

/// Which notion of "most likely" to resolve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolverMode {
    /// Per-node arg-max; each subtree commits to its single best winner.
    #[default]
    Greedy,
    /// Exact search over all complete brackets.
    Global,
}

#[derive(Clone, Copy)]
struct Pick {
    slot: Slot,
    table_slot: Slot,
    chain: f64,
    path: f64,
}

pub struct MostLikelyResolver;

impl MostLikelyResolver {
    pub fn resolve_with(
        mode: ResolverMode,
        tree: &BracketTree,
        table: &MatchupTable,
    ) -> Result<ResolvedBracket> {
        match mode {
            ResolverMode::Greedy => Self::resolve(tree, table),
            ResolverMode::Global => Self::resolve_global(tree, table),
        }
    }

    /// Resolve the most likely outcome of every game in `tree`.
    ///
    /// At each game the two candidate chains are
    /// `pL * pR * P(wL beats wR)` and `pL * pR * P(wR beats wL)`; the larger
    /// one advances. Exactly equal candidates go to the entrant with the lower
    /// bracket slot.
    pub fn resolve(tree: &BracketTree, table: &MatchupTable) -> Result<ResolvedBracket> {
        let mut picks: Vec<Pick> = Vec::with_capacity(tree.nodes().len());
        let mut games = Vec::with_capacity(tree.game_count());

        for node in tree.nodes() {
            let pick = match &node.kind {
                NodeKind::Leaf { entrant } => Pick {
                    slot: node.slots.start,
                    table_slot: table.slot_of(entrant.name())?,
                    chain: 1.0,
                    path: 1.0,
                },
                NodeKind::Game { left, right } => {
                    let l = picks[left.0];
                    let r = picks[right.0];
                    let p_left = table.probability_by_slot(l.table_slot, r.table_slot);
                    let p_right = table.probability_by_slot(r.table_slot, l.table_slot);
                    let base = l.chain * r.chain;
                    let left_chain = base * p_left;
                    let right_chain = base * p_right;

                    let left_advances = if left_chain == right_chain {
                        l.slot < r.slot
                    } else {
                        left_chain > right_chain
                    };
                    let (winner, chain, game_probability) = if left_advances {
                        (l, left_chain, p_left)
                    } else {
                        (r, right_chain, p_right)
                    };
                    let pick = Pick {
                        chain,
                        path: winner.path * game_probability,
                        ..winner
                    };

                    let game = ResolvedGame {
                        node: node.id,
                        round: node.round,
                        left: tree.entrants()[l.slot].clone(),
                        right: tree.entrants()[r.slot].clone(),
                        winner: tree.entrants()[pick.slot].clone(),
                        winner_slot: pick.slot,
                        game_probability,
                        chain_probability: pick.chain,
                        path_probability: pick.path,
                    };
                    tracing::trace!(
                        round = game.round,
                        left = %game.left,
                        right = %game.right,
                        winner = %game.winner,
                        chain = game.chain_probability,
                        "game resolved"
                    );
                    games.push(game);
                    pick
                }
            };
            picks.push(pick);
        }

        let resolved = ResolvedBracket {
            depth: tree.depth(),
            games,
            first_game: tree.len(),
        };
        tracing::debug!(
            champion = %resolved.champion(),
            chain = resolved.chain_probability(),
            "most likely bracket resolved"
        );
        Ok(resolved)
    }

    /// Globally most probable complete bracket.
    ///
    /// [`MostLikelyResolver::resolve`] commits to one winner per subtree, which
    /// can miss a better bracket where a slightly less likely sub-bracket
    /// winner has a much easier next game. This search keeps the best chain
    /// for every (node, entrant) pair instead and reconstructs the winning
    /// bracket top-down. Cost is O(N^2) lookups.
    ///
    /// Ties go to the lower slot, both for the champion and for the opponent
    /// an entrant is recorded as having beaten.
    pub fn resolve_global(tree: &BracketTree, table: &MatchupTable) -> Result<ResolvedBracket> {
        let table_slots = tree
            .entrants()
            .iter()
            .map(|e| table.slot_of(e.name()))
            .collect::<Result<Vec<Slot>>>()?;

        // best[node][offset] for the entrant at node.slots.start + offset
        let mut best: Vec<Vec<Option<Chain>>> = Vec::with_capacity(tree.nodes().len());
        for node in tree.nodes() {
            let row = match node.kind {
                NodeKind::Leaf { .. } => vec![Some(Chain::SEED)],
                NodeKind::Game { left, right } => {
                    let l_start = tree.node(left).slots.start;
                    let r_start = tree.node(right).slots.start;
                    let (l_row, r_row) = (&best[left.0], &best[right.0]);
                    let split = l_row.len();
                    let mut row: Vec<Option<Chain>> = vec![None; split + r_row.len()];

                    for (i, lx) in l_row.iter().enumerate() {
                        let Some(lx) = lx else { continue };
                        for (j, ry) in r_row.iter().enumerate() {
                            let Some(ry) = ry else { continue };
                            let (x, y) = (l_start + i, r_start + j);
                            let p = table.probability_by_slot(table_slots[x], table_slots[y]);
                            let q = table.probability_by_slot(table_slots[y], table_slots[x]);
                            let base = lx.chain * ry.chain;

                            Chain::offer(&mut row[i], base * p, lx.path * p, y, p);
                            Chain::offer(&mut row[split + j], base * q, ry.path * q, x, q);
                        }
                    }
                    row
                }
            };
            best.push(row);
        }

        let root = tree.root();
        let mut champion: Option<(Slot, f64)> = None;
        for (offset, chain) in best[root.id.0].iter().enumerate() {
            if let Some(chain) = chain {
                if champion.map_or(true, |(_, c)| chain.chain > c) {
                    champion = Some((root.slots.start + offset, chain.chain));
                }
            }
        }
        let (champion_slot, _) = champion.unwrap_or((root.slots.start, 0.0));

        // Walk back down, fixing each node's winner from its parent's record
        let mut games: Vec<Option<ResolvedGame>> = vec![None; tree.game_count()];
        let mut stack = vec![(root.id, champion_slot)];
        while let Some((id, winner_slot)) = stack.pop() {
            let node = tree.node(id);
            let Some((left, right)) = node.children() else {
                continue;
            };
            // Every pair of child entries offers to both sides, so every
            // slot of a game node holds a chain
            let chain = best[id.0][winner_slot - node.slots.start];
            debug_assert!(chain.is_some(), "no chain for slot {} at {:?}", winner_slot, id);
            let Some(chain) = chain else {
                continue;
            };
            let left_range = &tree.node(left).slots;
            let (left_slot, right_slot) = if left_range.contains(&winner_slot) {
                (winner_slot, chain.opponent)
            } else {
                (chain.opponent, winner_slot)
            };

            games[id.0 - tree.len()] = Some(ResolvedGame {
                node: id,
                round: node.round,
                left: tree.entrants()[left_slot].clone(),
                right: tree.entrants()[right_slot].clone(),
                winner: tree.entrants()[winner_slot].clone(),
                winner_slot,
                game_probability: chain.game_probability,
                chain_probability: chain.chain,
                path_probability: chain.path,
            });
            stack.push((left, left_slot));
            stack.push((right, right_slot));
        }

        let games: Vec<ResolvedGame> = games.into_iter().flatten().collect();
        debug_assert_eq!(games.len(), tree.game_count());
        let resolved = ResolvedBracket {
            depth: tree.depth(),
            games,
            first_game: tree.len(),
        };
        tracing::debug!(
            champion = %resolved.champion(),
            chain = resolved.chain_probability(),
            "globally most likely bracket resolved"
        );
        Ok(resolved)
    }
}

/// Best chain found so far for one entrant winning one subtree.
#[derive(Clone, Copy, Debug)]
struct Chain {
    chain: f64,
    path: f64,
    /// Slot of the opponent beaten in this node's game
    opponent: Slot,
    game_probability: f64,
}

impl Chain {
    const SEED: Chain = Chain {
        chain: 1.0,
        path: 1.0,
        opponent: 0,
        game_probability: 1.0,
    };

    /// Keep the candidate if it strictly beats the current best. Opponents are
    /// offered in slot order, so the first of several equal chains wins.
    fn offer(
        best: &mut Option<Chain>,
        chain: f64,
        path: f64,
        opponent: Slot,
        game_probability: f64,
    ) {
        if best.map_or(true, |b| chain > b.chain) {
            *best = Some(Chain {
                chain,
                path,
                opponent,
                game_probability,
            });
        }
    }
}

#[cfg(test)]
#[path = "resolver_tests.rs"]
mod resolver_tests;
