//! Labelled transitions between states.

use super::hooks::{Action, Gate, HookSlot};
use super::state::State;
use std::fmt;

/// A labelled edge from one state to another.
///
/// The destination is named by state label and must be registered in the
/// same [`Definition`](super::Definition) as the source. The source label is
/// a back-reference filled in by [`State::add_transition`]; it is only used
/// for lookup and diagnostics.
///
/// Gate and action are optional and independent of each other.
#[derive(Clone, Debug)]
pub struct Transition {
    label: String,
    source: Option<String>,
    destination: String,
    gate: HookSlot<Gate>,
    action: HookSlot<Action>,
}

impl Transition {
    /// Create an ungated transition with no action.
    pub fn new(label: impl Into<String>, destination: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            source: None,
            destination: destination.into(),
            gate: HookSlot::default(),
            action: HookSlot::default(),
        }
    }

    /// Add a gate (builder form).
    pub fn with_gate(self, gate: Gate) -> Self {
        self.gate.set(gate);
        self
    }

    /// Add a gate from a predicate closure (builder form).
    pub fn when<F>(self, predicate: F) -> Self
    where
        F: Fn(&State) -> bool + Send + Sync + 'static,
    {
        self.with_gate(Gate::new(predicate))
    }

    /// Add an action (builder form).
    pub fn with_action(self, action: Action) -> Self {
        self.action.set(action);
        self
    }

    /// Add an action from a closure (builder form).
    pub fn then<F>(self, effect: F) -> Self
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        self.with_action(Action::new(effect))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Label of the state this transition leaves, once attached.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Label of the state this transition enters.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    pub fn gate(&self) -> Option<Gate> {
        self.gate.get()
    }

    pub fn action(&self) -> Option<Action> {
        self.action.get()
    }

    /// Attach the gate. Like state hooks, gates and actions can be set
    /// through a shared reference while machines are bound.
    pub fn set_gate(&self, gate: Gate) {
        self.gate.set(gate);
    }

    pub fn set_action(&self, action: Action) {
        self.action.set(action);
    }

    pub fn clear_gate(&self) {
        self.gate.clear();
    }

    pub fn clear_action(&self) {
        self.action.clear();
    }

    /// Check if this transition may fire from `current`.
    ///
    /// Ungated transitions always may.
    pub fn allows(&self, current: &State) -> bool {
        self.gate.get().is_none_or(|g| g.check(current))
    }

    pub(crate) fn set_source(&mut self, label: &str) {
        self.source = Some(label.to_string());
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transition({})", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_transition_is_unattached() {
        let transition = Transition::new("coin", "unlocked");

        assert_eq!(transition.label(), "coin");
        assert_eq!(transition.destination(), "unlocked");
        assert!(transition.source().is_none());
        assert!(transition.gate().is_none());
        assert!(transition.action().is_none());
    }

    #[test]
    fn ungated_transition_always_allowed() {
        let transition = Transition::new("push", "locked");

        assert!(transition.allows(&State::new("locked")));
        assert!(transition.allows(&State::new("anything")));
    }

    #[test]
    fn allows_respects_gate() {
        let transition = Transition::new("push", "locked").when(|s| s.label() == "unlocked");

        assert!(transition.allows(&State::new("unlocked")));
        assert!(!transition.allows(&State::new("locked")));
    }

    #[test]
    fn clearing_gate_reopens_transition() {
        let transition = Transition::new("push", "locked").when(|_| false);
        assert!(!transition.allows(&State::new("locked")));

        transition.clear_gate();
        assert!(transition.allows(&State::new("locked")));
    }

    #[test]
    fn gate_and_action_are_independent() {
        let gated = Transition::new("a", "b").when(|_| true);
        let acting = Transition::new("a", "b").then(|_| {});

        assert!(gated.gate().is_some() && gated.action().is_none());
        assert!(acting.gate().is_none() && acting.action().is_some());
    }

    #[test]
    fn display_wraps_label() {
        assert_eq!(Transition::new("coin", "unlocked").to_string(), "Transition(coin)");
    }
}
