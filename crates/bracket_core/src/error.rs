//! Error taxonomy for bracket construction and probability lookups.
//!
//! Every variant is fatal to the computation that raised it. Nothing here is
//! retried: the engines are pure functions of their inputs.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BracketError {
    #[error("field of {count} entrants is not a power of two of at least 2")]
    InvalidFieldSize { count: usize },

    #[error("duplicate entrant: {name}")]
    DuplicateEntrant { name: String },

    #[error("invalid probability for {a} vs {b}: {reason}")]
    InvalidProbability { a: String, b: String, reason: String },

    #[error("unknown entrant: {name}")]
    UnknownEntrantReference { name: String },
}

impl BracketError {
    pub(crate) fn invalid_probability(a: &str, b: &str, reason: impl Into<String>) -> Self {
        BracketError::InvalidProbability {
            a: a.to_string(),
            b: b.to_string(),
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(name: &str) -> Self {
        BracketError::UnknownEntrantReference {
            name: name.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BracketError>;
