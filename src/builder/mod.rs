//! Builder API for ergonomic definition construction.
//!
//! This module provides a fluent builder and a label macro for wiring a
//! host's own types to the string-labelled engine.

pub mod definition;
pub mod error;
pub mod macros;

pub use definition::DefinitionBuilder;
pub use error::BuildError;

use crate::core::{Definition, Transition};

/// Build a definition from grammar text with an explicit initial state.
///
/// # Example
///
/// ```
/// use labelled_fsm::builder::from_rules;
///
/// let definition = from_rules(
///     "locked -> unlocked (coin); unlocked -> locked (push)",
///     "unlocked",
/// )
/// .unwrap();
///
/// assert_eq!(definition.initial_state().unwrap().label(), "unlocked");
/// ```
pub fn from_rules(text: &str, initial: &str) -> Result<Definition, BuildError> {
    DefinitionBuilder::new().rules(text).initial(initial).build()
}

/// Create a transition that only fires while `gate` holds for the current
/// state.
///
/// # Example
///
/// ```
/// use labelled_fsm::builder::gated_transition;
/// use labelled_fsm::core::State;
///
/// let transition = gated_transition("push", "locked", |s| s.label() == "unlocked");
///
/// assert!(transition.allows(&State::new("unlocked")));
/// assert!(!transition.allows(&State::new("locked")));
/// ```
pub fn gated_transition<F>(label: &str, destination: &str, gate: F) -> Transition
where
    F: Fn(&crate::core::State) -> bool + Send + Sync + 'static,
{
    Transition::new(label, destination).when(gate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::State;

    #[test]
    fn from_rules_sets_initial_state() {
        let definition = from_rules("a -> b (go); b -> a (back)", "b").unwrap();

        assert_eq!(definition.initial_state().unwrap().label(), "b");
    }

    #[test]
    fn from_rules_rejects_unknown_initial_state() {
        let result = from_rules("a -> b (go)", "c");

        assert!(matches!(result, Err(BuildError::UnknownInitialState { .. })));
    }

    #[test]
    fn gated_transition_respects_gate() {
        let transition = gated_transition("go", "b", |s| s.label() != "b");

        assert!(transition.allows(&State::new("a")));
        assert!(!transition.allows(&State::new("b")));
    }
}
