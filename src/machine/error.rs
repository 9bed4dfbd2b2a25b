//! Machine error types.

use crate::core::{ActionError, DefinitionError, HookKind};
use thiserror::Error;

/// Errors returned while constructing or driving a [`Machine`](super::Machine).
#[derive(Debug, Error)]
pub enum MachineError {
    #[error("no transition '{transition}' from state '{state}'")]
    NoTransition { state: String, transition: String },

    #[error("gate rejected transition '{transition}' from state '{state}'")]
    CannotPerformTransition { state: String, transition: String },

    #[error("definition has no initial state")]
    NoInitialState,

    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// A hook returned an error. The machine may already be in the new
    /// state: see [`Machine::perform_transition`](super::Machine::perform_transition).
    #[error("{hook} action failed in state '{state}'")]
    ActionFailed {
        hook: HookKind,
        state: String,
        #[source]
        source: ActionError,
    },
}

impl MachineError {
    /// Returns whether the machine is untouched and the caller can simply
    /// try another label.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            MachineError::NoTransition { .. } | MachineError::CannotPerformTransition { .. }
        )
    }

    /// Returns a stable code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            MachineError::NoTransition { .. } => "NO_TRANSITION",
            MachineError::CannotPerformTransition { .. } => "CANNOT_PERFORM_TRANSITION",
            MachineError::NoInitialState => "NO_INITIAL_STATE",
            MachineError::Definition(DefinitionError::UnknownState { .. }) => "UNKNOWN_STATE",
            MachineError::Definition(DefinitionError::DanglingTransition { .. }) => {
                "DANGLING_TRANSITION"
            }
            MachineError::ActionFailed { .. } => "ACTION_FAILED",
        }
    }
}
