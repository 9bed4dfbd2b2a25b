//! Definition error types.

use thiserror::Error;

/// Errors raised while assembling or validating a definition.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DefinitionError {
    #[error("unknown state '{label}'")]
    UnknownState { label: String },

    #[error("transition '{transition}' from '{state}' leads to unregistered state '{destination}'")]
    DanglingTransition {
        state: String,
        transition: String,
        destination: String,
    },
}
