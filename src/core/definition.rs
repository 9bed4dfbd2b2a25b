//! The static graph of states and transitions.

use super::error::DefinitionError;
use super::state::State;
use super::transition::Transition;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// A machine definition: every state, keyed by label, plus the initial
/// state.
///
/// The first state ever added becomes the initial state unless one was
/// designated explicitly; later additions never reassign it.
///
/// Definitions are append-only. Bind one to any number of
/// [`Machine`](crate::machine::Machine)s once its topology is complete; the
/// machines borrow it, so no state or transition can be added underneath
/// them. Gates and actions stay settable through shared references (see
/// [`Definition::state`] and [`Definition::transition`]) until the
/// transition that uses them fires.
///
/// Equality is structural: initial-state labels, state labels and each
/// state's set of transition labels. Hooks are ignored.
///
/// # Example
///
/// ```rust
/// use labelled_fsm::core::{Definition, State, Transition};
///
/// let mut definition = Definition::new();
/// definition.add_state(State::new("locked").with_transition(Transition::new("coin", "unlocked")));
/// definition.add_state(State::new("unlocked").with_transition(Transition::new("push", "locked")));
///
/// assert_eq!(definition.initial_state().unwrap().label(), "locked");
/// assert_eq!(definition.len(), 2);
/// assert!(definition.validate().is_ok());
/// ```
#[derive(Clone, Debug, Default)]
pub struct Definition {
    states: BTreeMap<String, State>,
    initial: Option<String>,
}

impl Definition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `state`, replacing any state with the same label.
    pub fn add_state(&mut self, state: State) -> &mut State {
        if self.initial.is_none() {
            tracing::trace!(state = %state.label(), "implicit initial state");
            self.initial = Some(state.label().to_string());
        }
        match self.states.entry(state.label().to_string()) {
            Entry::Occupied(mut slot) => {
                slot.insert(state);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(state),
        }
    }

    /// Fetch the state called `label`, creating and registering an empty
    /// one if none exists yet.
    ///
    /// Calling this twice with the same label returns the same state and
    /// adds nothing the second time.
    pub fn state_for_label(&mut self, label: &str) -> &mut State {
        let initial = &mut self.initial;
        self.states.entry(label.to_string()).or_insert_with(|| {
            initial.get_or_insert_with(|| label.to_string());
            State::new(label)
        })
    }

    pub fn state(&self, label: &str) -> Option<&State> {
        self.states.get(label)
    }

    pub fn state_mut(&mut self, label: &str) -> Option<&mut State> {
        self.states.get_mut(label)
    }

    /// The transition `transition` leaving state `state`.
    pub fn transition(&self, state: &str, transition: &str) -> Option<&Transition> {
        self.states.get(state)?.transition(transition)
    }

    pub fn transition_mut(&mut self, state: &str, transition: &str) -> Option<&mut Transition> {
        self.states.get_mut(state)?.transition_mut(transition)
    }

    /// All states in label order.
    pub fn states(&self) -> impl Iterator<Item = &State> {
        self.states.values()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn initial_state(&self) -> Option<&State> {
        self.initial.as_deref().and_then(|label| self.states.get(label))
    }

    /// Designate the initial state explicitly.
    pub fn set_initial_state(&mut self, label: &str) -> Result<(), DefinitionError> {
        if !self.states.contains_key(label) {
            return Err(DefinitionError::UnknownState {
                label: label.to_string(),
            });
        }
        self.initial = Some(label.to_string());
        Ok(())
    }

    /// Check that every transition leads to a registered state.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        for state in self.states.values() {
            for transition in state.transitions() {
                if !self.states.contains_key(transition.destination()) {
                    return Err(DefinitionError::DanglingTransition {
                        state: state.label().to_string(),
                        transition: transition.label().to_string(),
                        destination: transition.destination().to_string(),
                    });
                }
            }
        }
        Ok(())
    }
}

impl PartialEq for Definition {
    fn eq(&self, other: &Self) -> bool {
        self.initial == other.initial && self.states == other.states
    }
}

impl Eq for Definition {}

/// `definition += state` registers `state` like [`Definition::add_state`].
impl AddAssign<State> for Definition {
    fn add_assign(&mut self, state: State) {
        self.add_state(state);
    }
}
