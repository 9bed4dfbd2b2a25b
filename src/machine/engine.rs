//! Runtime cursor over a definition.

use super::config::MachineConfig;
use super::error::MachineError;
use crate::core::{
    Action, Definition, DefinitionError, HookKind, State, StateHistory, Transition,
    TransitionRecord,
};
use crate::grammar::GraphVizOptions;

type Logger = Box<dyn Fn(&str) + Send + Sync>;

/// A state machine bound to a [`Definition`].
///
/// The machine borrows its definition, so several machines can walk the
/// same topology while none of them can see it change. Hooks are read when
/// a transition fires, so gates and actions attached through
/// [`Definition::state`] or [`Definition::transition`] after binding take
/// effect on the next transition.
///
/// # Example
///
/// ```rust
/// use labelled_fsm::core::Definition;
/// use labelled_fsm::machine::{Machine, MachineError};
///
/// let definition: Definition = "locked -> unlocked (coin); unlocked -> locked (push);"
///     .parse()
///     .unwrap();
/// let mut machine = Machine::new(&definition).unwrap();
///
/// machine.perform_transition("coin").unwrap();
/// assert_eq!(machine.current_state().label(), "unlocked");
///
/// let err = machine.perform_transition("coin").unwrap_err();
/// assert!(matches!(err, MachineError::NoTransition { .. }));
/// assert_eq!(machine.current_state().label(), "unlocked");
/// ```
pub struct Machine<'d> {
    definition: &'d Definition,
    current: &'d State,
    config: MachineConfig,
    history: StateHistory,
    logger: Option<Logger>,
}

impl<'d> Machine<'d> {
    /// Bind a machine to `definition`, starting at its initial state.
    pub fn new(definition: &'d Definition) -> Result<Self, MachineError> {
        Self::with_config(definition, MachineConfig::default())
    }

    /// Bind a machine to `definition` with explicit settings.
    ///
    /// Fails when the definition is empty or a transition leads to a state
    /// that is not registered.
    pub fn with_config(
        definition: &'d Definition,
        config: MachineConfig,
    ) -> Result<Self, MachineError> {
        definition.validate()?;
        let current = definition
            .initial_state()
            .ok_or(MachineError::NoInitialState)?;
        let history = match config.history_limit {
            Some(limit) => StateHistory::with_limit(limit),
            None => StateHistory::new(),
        };

        tracing::debug!(initial = %current.label(), states = definition.len(), "machine bound");

        Ok(Self {
            definition,
            current,
            config,
            history,
            logger: None,
        })
    }

    pub fn current_state(&self) -> &'d State {
        self.current
    }

    /// Check if the machine is in the state called `label`.
    pub fn is_in(&self, label: impl AsRef<str>) -> bool {
        self.current.label() == label.as_ref()
    }

    pub fn definition(&self) -> &'d Definition {
        self.definition
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    pub fn history(&self) -> &StateHistory {
        &self.history
    }

    /// Labels of the transitions leaving the current state.
    pub fn available_transitions(&self) -> impl Iterator<Item = &'d str> {
        self.current.transition_labels()
    }

    /// Receive one human-readable line per transition attempt.
    pub fn set_logger<F>(&mut self, logger: F)
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.logger = Some(Box::new(logger));
    }

    pub fn clear_logger(&mut self) {
        self.logger = None;
    }

    /// Check whether `label` could fire from the current state.
    ///
    /// Evaluates the gate, if any, without running hooks or moving.
    pub fn can_perform_transition(&self, label: impl AsRef<str>) -> Result<bool, MachineError> {
        let label = label.as_ref();
        let transition = self.current.transition(label).ok_or_else(|| self.no_transition(label))?;
        Ok(transition.allows(self.current))
    }

    /// Fire the transition `label` from the current state.
    ///
    /// On success the hooks run in this order: the current state's exit
    /// action (with the old state), the move to the destination, the
    /// destination's entry action and then the transition's own action
    /// (both with the new state).
    ///
    /// A missing label or a closed gate leaves the machine untouched. A
    /// failing exit action also leaves it in the old state, but a failing
    /// entry or transition action is reported after the machine has already
    /// moved.
    pub fn perform_transition(&mut self, label: impl AsRef<str>) -> Result<(), MachineError> {
        let label = label.as_ref();
        let from = self.current;
        let Some(transition) = from.transition(label) else {
            self.log(|| format!("Cannot find transition called {label}"));
            return Err(self.no_transition(label));
        };

        if !transition.allows(from) {
            tracing::debug!(state = %from.label(), transition = %label, "gate rejected transition");
            self.log(|| "Transition guard prevented transition".to_string());
            return Err(MachineError::CannotPerformTransition {
                state: from.label().to_string(),
                transition: label.to_string(),
            });
        }

        let next = self.destination_of(transition)?;

        run_hook(from.exit_action(), HookKind::Exit, from)?;

        self.log(|| format!("{transition}: from {from} to new {next}"));
        tracing::debug!(
            from = %from.label(),
            to = %next.label(),
            transition = %label,
            "transition performed"
        );
        self.current = next;
        if self.config.record_history {
            self.history
                .record(TransitionRecord::now(from.label(), label, next.label()));
        }

        run_hook(next.entry_action(), HookKind::Entry, next)?;
        run_hook(transition.action(), HookKind::Transition, next)?;
        Ok(())
    }

    /// Render the definition as GraphViz with the current state highlighted.
    pub fn graph_viz(&self) -> String {
        let options = GraphVizOptions {
            highlight: Some(self.current.label().to_string()),
            ..GraphVizOptions::default()
        };
        self.definition.graph_viz_with(&options)
    }

    fn destination_of(&self, transition: &Transition) -> Result<&'d State, DefinitionError> {
        self.definition
            .state(transition.destination())
            .ok_or_else(|| DefinitionError::UnknownState {
                label: transition.destination().to_string(),
            })
    }

    fn no_transition(&self, label: &str) -> MachineError {
        tracing::debug!(state = %self.current.label(), transition = %label, "no such transition");
        MachineError::NoTransition {
            state: self.current.label().to_string(),
            transition: label.to_string(),
        }
    }

    fn log(&self, line: impl FnOnce() -> String) {
        if let Some(logger) = &self.logger {
            logger(&line());
        }
    }
}

fn run_hook(action: Option<Action>, hook: HookKind, state: &State) -> Result<(), MachineError> {
    let Some(action) = action else {
        return Ok(());
    };
    action.run(state).map_err(|source| {
        tracing::debug!(state = %state.label(), %hook, error = %source, "hook failed");
        MachineError::ActionFailed {
            hook,
            state: state.label().to_string(),
            source,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn turnstile() -> Definition {
        let mut definition = Definition::new();
        definition
            .process_definition_formats(
                "locked -> locked (push); locked -> unlocked (coin);
                 unlocked -> locked (push); unlocked -> unlocked (coin);",
            )
            .unwrap();
        definition
    }

    fn sink() -> (Arc<Mutex<Vec<String>>>, Arc<Mutex<Vec<String>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        (Arc::clone(&events), events)
    }

    #[test]
    fn starts_at_initial_state() {
        let definition = turnstile();
        let machine = Machine::new(&definition).unwrap();

        assert!(machine.is_in("locked"));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn empty_definition_has_no_initial_state() {
        let definition = Definition::new();

        assert!(matches!(
            Machine::new(&definition),
            Err(MachineError::NoInitialState)
        ));
    }

    #[test]
    fn dangling_destination_is_rejected_at_bind_time() {
        let mut definition = Definition::new();
        definition.add_state(State::new("a").with_transition(Transition::new("go", "b")));

        assert!(matches!(
            Machine::new(&definition),
            Err(MachineError::Definition(DefinitionError::DanglingTransition { .. }))
        ));
    }

    #[test]
    fn unknown_label_fails_without_moving() {
        let definition = turnstile();
        let mut machine = Machine::new(&definition).unwrap();

        assert!(matches!(
            machine.can_perform_transition("kick"),
            Err(MachineError::NoTransition { .. })
        ));
        assert!(matches!(
            machine.perform_transition("kick"),
            Err(MachineError::NoTransition { .. })
        ));
        assert!(machine.is_in("locked"));
    }

    #[test]
    fn closed_gate_blocks_without_hooks() {
        let (events, seen) = sink();
        let mut definition = turnstile();
        let exit_events = Arc::clone(&events);
        definition
            .state_mut("locked")
            .unwrap()
            .on_exit(move |_| exit_events.lock().unwrap().push("exit".into()));
        let transition = definition.transition_mut("locked", "coin").unwrap();
        transition.set_gate(crate::core::Gate::new(|_| false));
        let action_events = Arc::clone(&events);
        transition.set_action(Action::new(move |_| {
            action_events.lock().unwrap().push("action".into())
        }));

        let mut machine = Machine::new(&definition).unwrap();
        assert!(!machine.can_perform_transition("coin").unwrap());
        assert!(matches!(
            machine.perform_transition("coin"),
            Err(MachineError::CannotPerformTransition { .. })
        ));
        assert!(machine.is_in("locked"));
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn ungated_transition_can_be_performed() {
        let definition = turnstile();
        let mut machine = Machine::new(&definition).unwrap();

        assert!(machine.can_perform_transition("coin").unwrap());
        machine.perform_transition("coin").unwrap();
        assert!(machine.is_in("unlocked"));
    }

    #[test]
    fn hooks_fire_exit_entry_then_action() {
        let (events, seen) = sink();
        let mut definition = turnstile();

        let exit_events = Arc::clone(&events);
        definition.state_mut("locked").unwrap().on_exit(move |s| {
            exit_events.lock().unwrap().push(format!("exit {}", s.label()))
        });
        let entry_events = Arc::clone(&events);
        definition.state_mut("unlocked").unwrap().on_entry(move |s| {
            entry_events.lock().unwrap().push(format!("entry {}", s.label()))
        });
        let action_events = Arc::clone(&events);
        definition
            .transition_mut("locked", "coin")
            .unwrap()
            .set_action(Action::new(move |s| {
                action_events.lock().unwrap().push(format!("action {}", s.label()))
            }));

        let mut machine = Machine::new(&definition).unwrap();
        machine.perform_transition("coin").unwrap();

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["exit locked", "entry unlocked", "action unlocked"]
        );
    }

    #[test]
    fn hooks_attached_after_binding_fire() {
        let (events, seen) = sink();
        let definition = turnstile();
        let mut machine = Machine::new(&definition).unwrap();

        let entry_events = Arc::clone(&events);
        definition.state("unlocked").unwrap().on_entry(move |s| {
            entry_events.lock().unwrap().push(format!("entry {}", s.label()))
        });
        definition
            .transition("unlocked", "push")
            .unwrap()
            .set_gate(crate::core::Gate::new(|_| false));

        machine.perform_transition("coin").unwrap();
        assert_eq!(*seen.lock().unwrap(), vec!["entry unlocked"]);
        assert!(matches!(
            machine.perform_transition("push"),
            Err(MachineError::CannotPerformTransition { .. })
        ));

        definition.transition("unlocked", "push").unwrap().clear_gate();
        machine.perform_transition("push").unwrap();
        assert!(machine.is_in("locked"));
    }

    #[test]
    fn failing_exit_action_keeps_old_state() {
        let mut definition = turnstile();
        definition
            .state_mut("locked")
            .unwrap()
            .set_exit_action(Action::fallible(|_| Err("jammed".into())));

        let mut machine = Machine::new(&definition).unwrap();
        let err = machine.perform_transition("coin").unwrap_err();

        assert!(matches!(
            err,
            MachineError::ActionFailed {
                hook: HookKind::Exit,
                ..
            }
        ));
        assert!(machine.is_in("locked"));
        assert!(machine.history().is_empty());
    }

    #[test]
    fn failing_entry_action_has_already_moved() {
        let mut definition = turnstile();
        definition
            .state_mut("unlocked")
            .unwrap()
            .set_entry_action(Action::fallible(|_| Err("no clunk".into())));

        let mut machine = Machine::new(&definition).unwrap();
        let err = machine.perform_transition("coin").unwrap_err();

        assert!(matches!(
            err,
            MachineError::ActionFailed {
                hook: HookKind::Entry,
                ..
            }
        ));
        assert!(machine.is_in("unlocked"));
    }

    #[test]
    fn failing_transition_action_has_already_moved() {
        let mut definition = turnstile();
        definition
            .transition_mut("locked", "coin")
            .unwrap()
            .set_action(Action::fallible(|_| Err("receipt printer".into())));

        let mut machine = Machine::new(&definition).unwrap();
        let err = machine.perform_transition("coin").unwrap_err();

        assert!(matches!(
            err,
            MachineError::ActionFailed {
                hook: HookKind::Transition,
                ..
            }
        ));
        assert!(machine.is_in("unlocked"));
    }

    #[test]
    fn logger_sees_every_attempt() {
        let (lines, seen) = sink();
        let mut definition = turnstile();
        definition
            .transition_mut("unlocked", "push")
            .unwrap()
            .set_gate(crate::core::Gate::new(|_| false));

        let mut machine = Machine::new(&definition).unwrap();
        machine.set_logger(move |line| lines.lock().unwrap().push(line.to_string()));

        let _ = machine.perform_transition("kick");
        machine.perform_transition("coin").unwrap();
        let _ = machine.perform_transition("push");

        assert_eq!(
            *seen.lock().unwrap(),
            vec![
                "Cannot find transition called kick",
                "Transition(coin): from State(locked) to new State(unlocked)",
                "Transition guard prevented transition",
            ]
        );
    }

    #[test]
    fn history_tracks_fired_transitions() {
        let definition = turnstile();
        let mut machine = Machine::new(&definition).unwrap();

        machine.perform_transition("coin").unwrap();
        machine.perform_transition("push").unwrap();
        let _ = machine.perform_transition("kick");

        assert_eq!(machine.history().get_path(), vec!["locked", "unlocked", "locked"]);
    }

    #[test]
    fn history_can_be_disabled() {
        let definition = turnstile();
        let mut machine = Machine::with_config(&definition, MachineConfig::without_history()).unwrap();

        machine.perform_transition("coin").unwrap();
        assert!(machine.history().is_empty());
    }

    #[test]
    fn available_transitions_follow_current_state() {
        let mut definition = turnstile();
        definition.add_state(State::new("broken"));
        definition
            .state_mut("locked")
            .unwrap()
            .add_transition(Transition::new("kick", "broken"));

        let mut machine = Machine::new(&definition).unwrap();
        assert_eq!(
            machine.available_transitions().collect::<Vec<_>>(),
            vec!["coin", "kick", "push"]
        );

        machine.perform_transition("kick").unwrap();
        assert_eq!(machine.available_transitions().count(), 0);
    }

    #[test]
    fn machines_share_a_definition() {
        let definition = turnstile();
        let mut first = Machine::new(&definition).unwrap();
        let second = Machine::new(&definition).unwrap();

        first.perform_transition("coin").unwrap();
        assert!(first.is_in("unlocked"));
        assert!(second.is_in("locked"));
    }
}
