use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use bracket_core::{
    BracketTree, Entrant, MarginalProbabilityEngine, MatchupEntry, MatchupTable,
    MostLikelyResolver, NodeKind, Prediction,
};

const SEED: u64 = 0x5eed_b4ac;

fn numbered(n: usize) -> Vec<Entrant> {
    (0..n).map(|i| Entrant::new(format!("team-{:03}", i))).collect()
}

/// Random table listing roughly `density` of all pairs, in random orientation.
fn random_entries(rng: &mut StdRng, teams: &[Entrant], density: f64) -> Vec<MatchupEntry> {
    let mut entries = Vec::new();
    for i in 0..teams.len() {
        for j in i + 1..teams.len() {
            if !rng.gen_bool(density) {
                continue;
            }
            let p: f64 = rng.gen_range(0.0..=1.0);
            if rng.gen_bool(0.5) {
                entries.push(MatchupEntry::new(teams[i].clone(), teams[j].clone(), p));
            } else {
                entries.push(MatchupEntry::new(teams[j].clone(), teams[i].clone(), p));
            }
        }
    }
    entries
}

/// Every complete outcome of the bracket with its probability and champion.
fn enumerate_outcomes(tree: &BracketTree, table: &MatchupTable) -> Vec<(f64, usize)> {
    let games: Vec<_> = tree.games().collect();
    let mut outcomes = Vec::with_capacity(1 << games.len());

    for mask in 0u64..(1u64 << games.len()) {
        let mut winner = vec![0usize; tree.nodes().len()];
        let mut probability = 1.0;
        for node in tree.nodes() {
            match node.kind {
                NodeKind::Leaf { .. } => winner[node.id.0] = node.slots.start,
                NodeKind::Game { left, right } => {
                    let (a, b) = (winner[left.0], winner[right.0]);
                    let p = table
                        .probability(tree.entrants()[a].name(), tree.entrants()[b].name())
                        .unwrap();
                    let bit = node.id.0 - tree.len();
                    if mask & (1 << bit) == 0 {
                        winner[node.id.0] = a;
                        probability *= p;
                    } else {
                        winner[node.id.0] = b;
                        probability *= 1.0 - p;
                    }
                }
            }
        }
        outcomes.push((probability, winner[tree.root().id.0]));
    }
    outcomes
}

#[test]
fn tree_shape_for_every_field_size() {
    for k in 1..=7u32 {
        let n = 1usize << k;
        let tree = BracketTree::build(&numbered(n)).unwrap();
        assert_eq!(tree.game_count(), n - 1);
        assert_eq!(tree.depth(), k);
        assert_eq!(tree.root().round, k);
    }
}

#[test]
fn complements_hold_for_random_tables() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let teams = numbered(16);
    let entries = random_entries(&mut rng, &teams, 0.6);
    let table = MatchupTable::new(&teams, &entries).unwrap();

    for a in &teams {
        for b in &teams {
            if a == b {
                continue;
            }
            let sum = table.probability(a.name(), b.name()).unwrap()
                + table.probability(b.name(), a.name()).unwrap();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }
}

#[test]
fn node_mass_is_conserved_for_random_tables() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for k in 1..=7u32 {
        let teams = numbered(1 << k);
        let entries = random_entries(&mut rng, &teams, 0.5);
        let tree = BracketTree::build(&teams).unwrap();
        let table = MatchupTable::new(&teams, &entries).unwrap();

        for dist in MarginalProbabilityEngine::distributions(&tree, &table).unwrap() {
            assert!(
                (dist.total() - 1.0).abs() < 1e-9,
                "k={} node {:?} sums to {}",
                k,
                dist.node,
                dist.total()
            );
        }
    }
}

#[test]
fn marginals_match_brute_force_enumeration() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for n in [2usize, 4, 8] {
        let teams = numbered(n);
        let entries = random_entries(&mut rng, &teams, 0.8);
        let tree = BracketTree::build(&teams).unwrap();
        let table = MatchupTable::new(&teams, &entries).unwrap();

        let mut expected = vec![0.0; n];
        for (p, champion) in enumerate_outcomes(&tree, &table) {
            expected[champion] += p;
        }

        let marginals = MarginalProbabilityEngine::marginals(&tree, &table).unwrap();
        for (slot, team) in teams.iter().enumerate() {
            let got = marginals.championship(team.name()).unwrap();
            assert!(
                (got - expected[slot]).abs() < 1e-9,
                "{}: engine {} vs enumeration {}",
                team,
                got,
                expected[slot]
            );
        }
    }
}

#[test]
fn global_search_finds_the_most_probable_outcome() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 1);
    for n in [2usize, 4, 8] {
        let teams = numbered(n);
        let entries = random_entries(&mut rng, &teams, 1.0);
        let tree = BracketTree::build(&teams).unwrap();
        let table = MatchupTable::new(&teams, &entries).unwrap();

        let best = enumerate_outcomes(&tree, &table)
            .into_iter()
            .map(|(p, _)| p)
            .fold(0.0, f64::max);
        let global = MostLikelyResolver::resolve_global(&tree, &table).unwrap();
        assert!(
            (global.chain_probability() - best).abs() < 1e-12,
            "n={}: global search {} vs enumeration {}",
            n,
            global.chain_probability(),
            best
        );

        let greedy = MostLikelyResolver::resolve(&tree, &table).unwrap();
        assert!(greedy.chain_probability() <= global.chain_probability() + 1e-12);
    }
}

#[test]
fn greedy_chain_is_the_product_of_its_games() {
    let mut rng = StdRng::seed_from_u64(SEED ^ 2);
    let teams = numbered(32);
    let entries = random_entries(&mut rng, &teams, 0.7);
    let tree = BracketTree::build(&teams).unwrap();
    let table = MatchupTable::new(&teams, &entries).unwrap();

    let resolved = MostLikelyResolver::resolve(&tree, &table).unwrap();
    assert_eq!(resolved.games().len(), 31);
    let product: f64 = resolved.games().iter().map(|g| g.game_probability).product();
    assert!((resolved.chain_probability() - product).abs() < 1e-12);

    // Every game's participants are the predicted winners one round earlier
    for game in resolved.games().iter().filter(|g| g.round > 1) {
        let node = tree.node(game.node);
        let (left, right) = node.children().unwrap();
        assert_eq!(resolved.game(left).unwrap().winner, game.left);
        assert_eq!(resolved.game(right).unwrap().winner, game.right);
    }
}

#[test]
fn repeated_predictions_are_identical() {
    let mut rng = StdRng::seed_from_u64(SEED);
    let teams = numbered(64);
    let entries = random_entries(&mut rng, &teams, 0.3);

    let first = Prediction::compute(&teams, &entries).unwrap();
    let second = Prediction::compute(&teams, &entries).unwrap();
    assert_eq!(first, second);
}
