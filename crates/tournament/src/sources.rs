//! Input files: the entrant list and the matchup table
//!
//! Entrant list: one name per line in bracket order. Blank lines and lines
//! starting with `#` are ignored.
//!
//! Matchup table: header-less CSV with three columns,
//!
//! ```text
//! team_a,team_b,probability_a_wins
//! ```
//!
//! Each unordered pair should appear at most once; either orientation works.
//! Pairs that are not listed fall back to ratings (if given) or a coin flip.

use bracket_core::{validate_field, Entrant, MatchupEntry};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;

use crate::error::{self, Result, TournamentError};

/// Read and validate the entrant list
pub fn read_entrants(path: &Path) -> Result<Vec<Entrant>> {
    let contents = error::read_to_string(path)?;
    let entrants = parse_entrants(&contents)?;
    tracing::debug!(path = %path.display(), count = entrants.len(), "entrants loaded");
    Ok(entrants)
}

pub fn parse_entrants(text: &str) -> Result<Vec<Entrant>> {
    let entrants: Vec<Entrant> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(Entrant::from)
        .collect();
    validate_field(&entrants)?;
    Ok(entrants)
}

/// Read the pairwise probability CSV
pub fn read_matchups(path: &Path) -> Result<Vec<MatchupEntry>> {
    let contents = error::read_to_string(path)?;
    let entries = parse_matchups(contents.as_bytes())?;
    tracing::debug!(path = %path.display(), count = entries.len(), "matchups loaded");
    Ok(entries)
}

pub fn parse_matchups<R: Read>(reader: R) -> Result<Vec<MatchupEntry>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .comment(Some(b'#'))
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut entries = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.iter().all(str::is_empty) {
            continue;
        }
        if record.len() != 3 {
            return Err(TournamentError::MalformedRow {
                line,
                reason: format!("expected 3 columns, found {}", record.len()),
            });
        }

        let probability: f64 = record[2].parse().map_err(|_| TournamentError::MalformedRow {
            line,
            reason: format!("'{}' is not a probability", &record[2]),
        })?;
        entries.push(MatchupEntry::new(&record[0], &record[1], probability));
    }
    Ok(entries)
}

/// Combine explicit entries with derived ones. Explicit entries win: a
/// derived entry is only kept for pairs the explicit list does not mention.
pub fn merge_matchups(
    explicit: Vec<MatchupEntry>,
    derived: Vec<MatchupEntry>,
) -> Vec<MatchupEntry> {
    let listed: HashSet<(String, String)> = explicit.iter().map(pair_key).collect();
    let mut merged = explicit;
    merged.extend(derived.into_iter().filter(|e| !listed.contains(&pair_key(e))));
    merged
}

fn pair_key(entry: &MatchupEntry) -> (String, String) {
    let (a, b) = (entry.a.name(), entry.b.name());
    if a <= b {
        (a.to_string(), b.to_string())
    } else {
        (b.to_string(), a.to_string())
    }
}

#[cfg(test)]
#[path = "sources_tests.rs"]
mod sources_tests;
