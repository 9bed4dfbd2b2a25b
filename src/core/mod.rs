//! Topology model of a state machine.
//!
//! This module contains the static graph a machine runs on:
//! - `State` and `Transition` records, keyed by label
//! - `Definition`, the container that owns every state
//! - `Gate` and `Action` hooks attached to states and transitions
//! - `StateHistory`, the record of fired transitions
//!
//! Nothing here evaluates transitions; see [`crate::machine`].

mod definition;
mod error;
mod history;
mod hooks;
mod state;
mod transition;

pub use definition::Definition;
pub use error::DefinitionError;
pub use history::{StateHistory, TransitionRecord};
pub use hooks::{Action, ActionError, Gate, HookKind};
pub use state::State;
pub use transition::Transition;
