//! Build errors for the definition builder.

use crate::grammar::GrammarError;
use thiserror::Error;

/// Errors that can occur when building a definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BuildError {
    #[error("No states defined. Add a state, a transition or a rule")]
    EmptyDefinition,

    #[error("Initial state '{label}' is not part of the definition")]
    UnknownInitialState { label: String },

    #[error(transparent)]
    Grammar(#[from] GrammarError),
}
