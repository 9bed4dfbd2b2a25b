//! Gate predicates and action hooks attached to states and transitions.
//!
//! Gates decide whether a transition may fire. Actions run as side effects
//! on exit, entry, or when a transition fires. Both are stored by value on
//! the record they belong to and are cheap to clone.

use super::state::State;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// Error type a fallible action may return.
///
/// The engine never inspects it; it is handed back to the caller as the
/// `source` of [`MachineError::ActionFailed`](crate::machine::MachineError::ActionFailed).
pub type ActionError = Box<dyn std::error::Error + Send + Sync + 'static>;

type Predicate = Arc<dyn Fn(&State) -> bool + Send + Sync>;
type Effect = Arc<dyn Fn(&State) -> Result<(), ActionError> + Send + Sync>;

/// Predicate that determines if a transition can fire.
///
/// A gate is evaluated against the machine's current state, before any hook
/// runs. It should not have side effects.
///
/// # Example
///
/// ```rust
/// use labelled_fsm::core::{Gate, State};
///
/// let only_locked = Gate::new(|s: &State| s.label() == "locked");
///
/// assert!(only_locked.check(&State::new("locked")));
/// assert!(!only_locked.check(&State::new("unlocked")));
/// ```
#[derive(Clone)]
pub struct Gate {
    predicate: Predicate,
}

impl Gate {
    /// Create a gate from a predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&State) -> bool + Send + Sync + 'static,
    {
        Gate {
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the gate lets a transition leave `state`.
    pub fn check(&self, state: &State) -> bool {
        (self.predicate)(state)
    }
}

impl fmt::Debug for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Gate(..)")
    }
}

/// Side-effecting hook invoked with a state.
///
/// Exit actions receive the state being left, entry and transition actions
/// receive the state just entered.
///
/// # Example
///
/// ```rust
/// use labelled_fsm::core::{Action, State};
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
///
/// let clunks = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&clunks);
/// let clunk = Action::new(move |_: &State| {
///     counter.fetch_add(1, Ordering::SeqCst);
/// });
///
/// clunk.run(&State::new("unlocked")).unwrap();
/// assert_eq!(clunks.load(Ordering::SeqCst), 1);
/// ```
#[derive(Clone)]
pub struct Action {
    effect: Effect,
}

impl Action {
    /// Create an action from a closure that cannot fail.
    pub fn new<F>(effect: F) -> Self
    where
        F: Fn(&State) + Send + Sync + 'static,
    {
        Action {
            effect: Arc::new(move |state| {
                effect(state);
                Ok(())
            }),
        }
    }

    /// Create an action from a closure that may fail.
    ///
    /// A returned error aborts the remaining hooks of the transition and is
    /// propagated to the caller of `perform_transition`.
    pub fn fallible<F>(effect: F) -> Self
    where
        F: Fn(&State) -> Result<(), ActionError> + Send + Sync + 'static,
    {
        Action {
            effect: Arc::new(effect),
        }
    }

    /// Run the action against `state`.
    pub fn run(&self, state: &State) -> Result<(), ActionError> {
        (self.effect)(state)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

/// A hook attached to a state or transition.
///
/// Slots are written through shared references, so hooks can be attached or
/// swapped while machines borrow the definition. Readers take a clone of
/// the hook and release the lock before running it.
pub(crate) struct HookSlot<T> {
    hook: RwLock<Option<T>>,
}

impl<T: Clone> HookSlot<T> {
    pub(crate) fn new(hook: Option<T>) -> Self {
        Self {
            hook: RwLock::new(hook),
        }
    }

    pub(crate) fn get(&self) -> Option<T> {
        self.hook.read().clone()
    }

    pub(crate) fn set(&self, hook: T) {
        *self.hook.write() = Some(hook);
    }

    pub(crate) fn clear(&self) {
        *self.hook.write() = None;
    }
}

impl<T: Clone> Clone for HookSlot<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone> Default for HookSlot<T> {
    fn default() -> Self {
        Self::new(None)
    }
}

impl<T: fmt::Debug> fmt::Debug for HookSlot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.hook.read().fmt(f)
    }
}

/// Which hook slot an action was attached to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HookKind {
    Exit,
    Entry,
    Transition,
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HookKind::Exit => "exit",
            HookKind::Entry => "entry",
            HookKind::Transition => "transition",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[test]
    fn gate_allows_matching_states() {
        let gate = Gate::new(|s: &State| s.label() == "locked");

        assert!(gate.check(&State::new("locked")));
        assert!(!gate.check(&State::new("unlocked")));
    }

    #[test]
    fn gate_is_deterministic() {
        let state = State::new("pending");
        let gate = Gate::new(|s: &State| s.label().starts_with('p'));

        assert_eq!(gate.check(&state), gate.check(&state));
    }

    #[test]
    fn cloned_gate_shares_predicate() {
        let gate = Gate::new(|s: &State| s.transitions().count() == 0);
        let cloned = gate.clone();

        let state = State::new("idle");
        assert_eq!(gate.check(&state), cloned.check(&state));
    }

    #[test]
    fn infallible_action_always_succeeds() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let action = Action::new(move |s: &State| sink.lock().unwrap().push(s.label().to_string()));

        assert!(action.run(&State::new("a")).is_ok());
        assert!(action.run(&State::new("b")).is_ok());
        assert_eq!(*seen.lock().unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn fallible_action_returns_its_error() {
        let action = Action::fallible(|s: &State| Err(format!("refused in {}", s.label()).into()));

        let err = action.run(&State::new("rejected")).unwrap_err();
        assert_eq!(err.to_string(), "refused in rejected");
    }

    #[test]
    fn hook_kind_displays_slot_name() {
        assert_eq!(HookKind::Exit.to_string(), "exit");
        assert_eq!(HookKind::Entry.to_string(), "entry");
        assert_eq!(HookKind::Transition.to_string(), "transition");
    }
}
