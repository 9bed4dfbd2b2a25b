//! States of a machine definition.
//!
//! A state is identified by its label and owns the transitions that leave
//! it, keyed by transition label.

use super::hooks::{Action, HookSlot};
use super::transition::Transition;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;

/// A labelled state and its outgoing transitions.
///
/// At most one transition with a given label leaves a state; adding a
/// second one replaces the first.
///
/// Two states compare equal when their labels and their sets of outgoing
/// transition labels match. Hooks and destinations are not compared.
///
/// # Example
///
/// ```rust
/// use labelled_fsm::core::{State, Transition};
///
/// let mut locked = State::new("locked");
/// locked.add_transition(Transition::new("coin", "unlocked"));
/// locked.add_transition(Transition::new("push", "locked"));
///
/// let coin = locked.transition("coin").unwrap();
/// assert_eq!(coin.destination(), "unlocked");
/// assert_eq!(coin.source(), Some("locked"));
/// assert_eq!(locked.transition_labels().collect::<Vec<_>>(), vec!["coin", "push"]);
/// ```
#[derive(Clone, Debug)]
pub struct State {
    label: String,
    transitions: BTreeMap<String, Transition>,
    entry_action: HookSlot<Action>,
    exit_action: HookSlot<Action>,
}

impl State {
    /// Create a state with no transitions and no hooks.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            transitions: BTreeMap::new(),
            entry_action: HookSlot::default(),
            exit_action: HookSlot::default(),
        }
    }

    /// Add a transition, returning the state for chaining.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.add_transition(transition);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Attach `transition` to this state.
    ///
    /// Points the transition's source back at this state and replaces any
    /// transition already registered under the same label.
    pub fn add_transition(&mut self, mut transition: Transition) -> &mut Transition {
        transition.set_source(&self.label);
        match self.transitions.entry(transition.label().to_string()) {
            Entry::Occupied(mut slot) => {
                tracing::trace!(state = %self.label, transition = %slot.key(), "replacing transition");
                slot.insert(transition);
                slot.into_mut()
            }
            Entry::Vacant(slot) => slot.insert(transition),
        }
    }

    /// Look up the outgoing transition called `label`.
    pub fn transition(&self, label: &str) -> Option<&Transition> {
        self.transitions.get(label)
    }

    pub fn transition_mut(&mut self, label: &str) -> Option<&mut Transition> {
        self.transitions.get_mut(label)
    }

    /// Outgoing transitions in label order.
    pub fn transitions(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.values()
    }

    pub fn transition_labels(&self) -> impl Iterator<Item = &str> {
        self.transitions.keys().map(String::as_str)
    }

    pub fn entry_action(&self) -> Option<Action> {
        self.entry_action.get()
    }

    pub fn exit_action(&self) -> Option<Action> {
        self.exit_action.get()
    }

    /// Attach the entry action.
    ///
    /// Hooks can be attached through a shared reference, including while
    /// machines are bound to the definition; the next transition into this
    /// state runs the new action.
    pub fn set_entry_action(&self, action: Action) {
        self.entry_action.set(action);
    }

    pub fn set_exit_action(&self, action: Action) {
        self.exit_action.set(action);
    }

    pub fn clear_entry_action(&self) {
        self.entry_action.clear();
    }

    pub fn clear_exit_action(&self) {
        self.exit_action.clear();
    }

    /// Set the entry action from a closure.
    pub fn on_entry<F>(&self, effect: F) -> &Self
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        self.set_entry_action(Action::new(effect));
        self
    }

    /// Set the exit action from a closure.
    pub fn on_exit<F>(&self, effect: F) -> &Self
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        self.set_exit_action(Action::new(effect));
        self
    }
}

impl PartialEq for State {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.transitions.keys().eq(other.transitions.keys())
    }
}

impl Eq for State {}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "State({})", self.label)
    }
}
