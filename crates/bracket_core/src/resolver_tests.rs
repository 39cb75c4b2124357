use super::*;
use crate::error::BracketError;
use crate::types::MatchupEntry;

fn field(names: &[&str]) -> Vec<Entrant> {
    names.iter().map(|&n| Entrant::from(n)).collect()
}

fn resolve(names: &[&str], entries: &[MatchupEntry]) -> ResolvedBracket {
    let teams = field(names);
    let tree = BracketTree::build(&teams).unwrap();
    let table = MatchupTable::new(&teams, entries).unwrap();
    MostLikelyResolver::resolve(&tree, &table).unwrap()
}

#[test]
fn test_single_game() {
    let bracket = resolve(&["A", "B"], &[MatchupEntry::new("A", "B", 0.9)]);
    assert_eq!(bracket.champion().name(), "A");
    assert!((bracket.chain_probability() - 0.9).abs() < 1e-12);
    assert_eq!(bracket.games().len(), 1);
    assert_eq!(bracket.final_game().loser().name(), "B");
}

#[test]
fn test_single_game_underdog_listed_first() {
    let bracket = resolve(&["A", "B"], &[MatchupEntry::new("B", "A", 0.65)]);
    assert_eq!(bracket.champion().name(), "B");
    assert!((bracket.chain_probability() - 0.65).abs() < 1e-12);
}

#[test]
fn test_symmetric_bracket_uses_lowest_slot_tie_break() {
    let bracket = resolve(&["A", "B", "C", "D"], &[]);

    let rounds = bracket.rounds();
    assert_eq!(rounds.len(), 2);
    assert_eq!(
        rounds[0].iter().map(|e| e.name()).collect::<Vec<_>>(),
        vec!["A", "C"]
    );
    assert_eq!(bracket.champion().name(), "A");
    // A wins two coin flips; the whole bracket is three coin flips
    assert!((bracket.champion_path_probability() - 0.25).abs() < 1e-12);
    assert!((bracket.chain_probability() - 0.125).abs() < 1e-12);
}

#[test]
fn test_asymmetric_four_team_bracket() {
    let bracket = resolve(
        &["A", "B", "C", "D"],
        &[
            MatchupEntry::new("A", "B", 0.8),
            MatchupEntry::new("C", "D", 0.6),
            MatchupEntry::new("A", "C", 0.7),
        ],
    );

    let final_game = bracket.final_game();
    assert_eq!(final_game.round, 2);
    assert_eq!(final_game.left.name(), "A");
    assert_eq!(final_game.right.name(), "C");
    assert_eq!(bracket.champion().name(), "A");
    assert!((bracket.chain_probability() - 0.8 * 0.6 * 0.7).abs() < 1e-12);
    assert!((bracket.champion_path_probability() - 0.8 * 0.7).abs() < 1e-12);
}

#[test]
fn test_final_uses_predicted_opponent() {
    // A would lose to C, but D is the predicted winner of the right half
    let bracket = resolve(
        &["A", "B", "C", "D"],
        &[
            MatchupEntry::new("A", "B", 0.9),
            MatchupEntry::new("D", "C", 0.8),
            MatchupEntry::new("A", "C", 0.1),
            MatchupEntry::new("A", "D", 0.7),
        ],
    );

    let final_game = bracket.final_game();
    assert_eq!(final_game.right.name(), "D");
    assert_eq!(bracket.champion().name(), "A");
    assert!((final_game.game_probability - 0.7).abs() < 1e-12);
    assert!((bracket.chain_probability() - 0.9 * 0.8 * 0.7).abs() < 1e-12);
}

#[test]
fn test_expected_bracket_matches() {
    let bracket = resolve(
        &["A", "B", "C", "D"],
        &[
            MatchupEntry::new("A", "B", 1.0),
            MatchupEntry::new("C", "D", 0.0),
            MatchupEntry::new("A", "D", 0.5),
        ],
    );

    let first_round: Vec<_> = bracket
        .games_in_round(1)
        .map(|g| (g.left.name(), g.right.name(), g.winner.name()))
        .collect();
    assert_eq!(first_round, vec![("A", "B", "A"), ("C", "D", "D")]);

    let final_game = bracket.final_game();
    assert_eq!(
        (
            final_game.left.name(),
            final_game.right.name(),
            final_game.winner.name()
        ),
        ("A", "D", "A")
    );
    assert_eq!(final_game.winner_slot, 0);
    assert!((bracket.chain_probability() - 0.5).abs() < 1e-12);
}

#[test]
fn test_favorite_chain() {
    let bracket = resolve(
        &["A", "B", "C", "D"],
        &[
            MatchupEntry::new("A", "B", 0.9),
            MatchupEntry::new("C", "D", 0.8),
            MatchupEntry::new("A", "C", 0.6),
            MatchupEntry::new("A", "D", 0.7),
        ],
    );
    assert_eq!(bracket.champion().name(), "A");
    assert!((bracket.chain_probability() - 0.9 * 0.8 * 0.6).abs() < 1e-9);
}

#[test]
fn test_game_lookup_by_node() {
    let teams = field(&["A", "B", "C", "D"]);
    let tree = BracketTree::build(&teams).unwrap();
    let table = MatchupTable::uniform(&teams).unwrap();
    let bracket = MostLikelyResolver::resolve(&tree, &table).unwrap();

    for node in tree.games() {
        let game = bracket.game(node.id).unwrap();
        assert_eq!(game.node, node.id);
        assert_eq!(game.round, node.round);
    }
    for leaf in tree.leaves() {
        assert!(bracket.game(leaf.id).is_none());
    }
}

#[test]
fn test_table_over_different_field_fails() {
    let tree = BracketTree::build(&field(&["A", "B"])).unwrap();
    let table = MatchupTable::uniform(&field(&["A", "C"])).unwrap();
    let err = MostLikelyResolver::resolve(&tree, &table).unwrap_err();
    assert_eq!(
        err,
        BracketError::UnknownEntrantReference {
            name: "B".to_string()
        }
    );
}

#[test]
fn test_resolve_is_idempotent() {
    let teams: Vec<Entrant> = (0..16).map(|i| Entrant::new(format!("T{}", i))).collect();
    let entries: Vec<MatchupEntry> = (0..16)
        .flat_map(|i| (i + 1..16).map(move |j| (i, j)))
        .map(|(i, j)| {
            MatchupEntry::new(
                format!("T{}", i),
                format!("T{}", j),
                ((i * 7 + j * 3) % 11) as f64 / 10.0,
            )
        })
        .collect();
    let tree = BracketTree::build(&teams).unwrap();
    let table = MatchupTable::new(&teams, &entries).unwrap();

    let first = MostLikelyResolver::resolve(&tree, &table).unwrap();
    let second = MostLikelyResolver::resolve(&tree, &table).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.chain_probability().to_bits(),
        second.chain_probability().to_bits()
    );
}

#[test]
fn test_global_search_beats_greedy_commitment() {
    // A edges B, but B walks through C while A would only split with C
    let entries = [
        MatchupEntry::new("A", "B", 0.51),
        MatchupEntry::new("C", "D", 1.0),
        MatchupEntry::new("A", "C", 0.5),
        MatchupEntry::new("B", "C", 1.0),
    ];
    let teams = field(&["A", "B", "C", "D"]);
    let tree = BracketTree::build(&teams).unwrap();
    let table = MatchupTable::new(&teams, &entries).unwrap();

    let greedy = MostLikelyResolver::resolve(&tree, &table).unwrap();
    assert_eq!(greedy.champion().name(), "A");
    assert!((greedy.chain_probability() - 0.51 * 0.5).abs() < 1e-12);

    let global = MostLikelyResolver::resolve_global(&tree, &table).unwrap();
    assert_eq!(global.champion().name(), "B");
    assert!((global.chain_probability() - 0.49).abs() < 1e-12);
    assert_eq!(global.games().len(), 3);

    let first_round: Vec<_> = global
        .games_in_round(1)
        .map(|g| g.winner.name())
        .collect();
    assert_eq!(first_round, vec!["B", "C"]);
    assert_eq!(global.final_game().left.name(), "B");
    assert_eq!(global.final_game().right.name(), "C");
}

#[test]
fn test_global_search_agrees_on_symmetric_bracket() {
    let teams = field(&["A", "B", "C", "D"]);
    let tree = BracketTree::build(&teams).unwrap();
    let table = MatchupTable::uniform(&teams).unwrap();

    let greedy = MostLikelyResolver::resolve(&tree, &table).unwrap();
    let global = MostLikelyResolver::resolve_global(&tree, &table).unwrap();
    assert_eq!(greedy, global);
}

#[test]
fn test_global_search_records_every_game_with_certain_results() {
    // Zero-probability chains everywhere except the favorite's path
    let teams = field(&["A", "B", "C", "D", "E", "F", "G", "H"]);
    let entries: Vec<MatchupEntry> = teams
        .iter()
        .enumerate()
        .flat_map(|(i, a)| teams[i + 1..].iter().map(move |b| (a, b)))
        .map(|(a, b)| MatchupEntry::new(a.clone(), b.clone(), 1.0))
        .collect();
    let tree = BracketTree::build(&teams).unwrap();
    let table = MatchupTable::new(&teams, &entries).unwrap();

    let global = MostLikelyResolver::resolve_global(&tree, &table).unwrap();
    assert_eq!(global.games().len(), tree.game_count());
    assert_eq!(global.champion().name(), "A");
    assert_eq!(global.chain_probability(), 1.0);
    for node in tree.games() {
        let game = global.game(node.id).unwrap();
        assert_eq!(game.round, node.round);
        assert_eq!(game.winner, tree.entrants()[node.slots.start]);
    }
}
