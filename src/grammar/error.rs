//! Grammar error types.

use thiserror::Error;

/// Errors raised while reading the transition grammar.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GrammarError {
    /// A statement did not match `SOURCE -> DEST (LABEL)`.
    ///
    /// `applied` statements before it were already added to the definition.
    #[error("invalid rule '{statement}' after {applied} applied statement(s)")]
    InvalidRule { applied: usize, statement: String },
}

impl GrammarError {
    /// Number of statements applied before parsing stopped.
    pub fn applied(&self) -> usize {
        match self {
            GrammarError::InvalidRule { applied, .. } => *applied,
        }
    }
}
