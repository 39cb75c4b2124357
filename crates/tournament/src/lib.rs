//! Bracket predictions from files
//!
//! This crate provides infrastructure for:
//! - Reading a field of entrants and pairwise win probabilities
//! - Deriving missing probabilities from Elo ratings
//! - Rendering and storing prediction reports
//!
//! # Usage
//!
//! ```bash
//! # Most likely bracket and title odds for a field
//! cargo run -p tournament -- predict --teams teams.txt --probs probs.csv
//!
//! # Fill unlisted pairs from ratings, show per-round odds
//! cargo run -p tournament -- predict --teams teams.txt --ratings elo.json --rounds
//!
//! # Re-render a saved report
//! cargo run -p tournament -- show report.json
//! ```

mod config;
mod elo;
mod error;
mod predict;
mod results;
mod sources;

pub use config::*;
pub use elo::*;
pub use error::{Result, TournamentError};
pub use predict::*;
pub use results::*;
pub use sources::*;
