//! Builder for constructing definitions.

use crate::builder::error::BuildError;
use crate::core::{Definition, Transition};

enum Step {
    State(String),
    Transition {
        from: String,
        label: String,
        to: String,
    },
    Rules(String),
}

/// Builder for constructing definitions with a fluent API.
///
/// Steps are applied in the order they were added, so the first state
/// mentioned becomes initial unless [`initial`](Self::initial) names
/// another one.
pub struct DefinitionBuilder {
    initial: Option<String>,
    steps: Vec<Step>,
}

impl DefinitionBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            initial: None,
            steps: Vec::new(),
        }
    }

    /// Set the initial state explicitly.
    pub fn initial(mut self, label: impl Into<String>) -> Self {
        self.initial = Some(label.into());
        self
    }

    /// Declare a state, even one with no transitions.
    pub fn state(mut self, label: impl Into<String>) -> Self {
        self.steps.push(Step::State(label.into()));
        self
    }

    /// Add a transition `label` from `from` to `to`.
    pub fn transition(
        mut self,
        from: impl Into<String>,
        label: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        self.steps.push(Step::Transition {
            from: from.into(),
            label: label.into(),
            to: to.into(),
        });
        self
    }

    /// Add rules in the transition grammar.
    pub fn rules(mut self, text: impl Into<String>) -> Self {
        self.steps.push(Step::Rules(text.into()));
        self
    }

    /// Build the definition.
    /// Returns an error if a rule is malformed, nothing was declared, or the
    /// initial state was never declared.
    pub fn build(self) -> Result<Definition, BuildError> {
        let mut definition = Definition::new();

        for step in self.steps {
            match step {
                Step::State(label) => {
                    definition.state_for_label(&label);
                }
                Step::Transition { from, label, to } => {
                    definition.state_for_label(&from);
                    definition.state_for_label(&to);
                    definition
                        .state_for_label(&from)
                        .add_transition(Transition::new(label, to));
                }
                Step::Rules(text) => {
                    definition.process_definition_formats(&text)?;
                }
            }
        }

        if definition.is_empty() {
            return Err(BuildError::EmptyDefinition);
        }

        if let Some(label) = self.initial {
            if definition.set_initial_state(&label).is_err() {
                return Err(BuildError::UnknownInitialState { label });
            }
        }

        Ok(definition)
    }
}

impl Default for DefinitionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarError;

    #[test]
    fn builder_requires_states() {
        let result = DefinitionBuilder::new().build();

        assert_eq!(result, Err(BuildError::EmptyDefinition));
    }

    #[test]
    fn builder_rejects_unknown_initial_state() {
        let result = DefinitionBuilder::new()
            .transition("locked", "coin", "unlocked")
            .initial("broken")
            .build();

        assert_eq!(
            result,
            Err(BuildError::UnknownInitialState {
                label: "broken".to_string()
            })
        );
    }

    #[test]
    fn builder_surfaces_grammar_errors() {
        let result = DefinitionBuilder::new()
            .rules("locked -> unlocked (coin); locked -> unlocked coin")
            .build();

        assert_eq!(
            result,
            Err(BuildError::Grammar(GrammarError::InvalidRule {
                applied: 1,
                statement: "locked -> unlocked coin".to_string()
            }))
        );
    }

    #[test]
    fn fluent_api_matches_grammar() {
        let built = DefinitionBuilder::new()
            .transition("locked", "push", "locked")
            .transition("locked", "coin", "unlocked")
            .rules("unlocked -> locked (push); unlocked -> unlocked (coin)")
            .build()
            .unwrap();

        let parsed: Definition = "locked -> locked (push); locked -> unlocked (coin);
                                  unlocked -> locked (push); unlocked -> unlocked (coin)"
            .parse()
            .unwrap();

        assert_eq!(built, parsed);
    }

    #[test]
    fn explicit_initial_overrides_first_mention() {
        let definition = DefinitionBuilder::new()
            .state("idle")
            .transition("waiting", "insert_card", "wait_for_pin")
            .initial("waiting")
            .build()
            .unwrap();

        assert_eq!(definition.initial_state().unwrap().label(), "waiting");
        assert!(definition.state("idle").unwrap().transitions().next().is_none());
    }

    #[test]
    fn first_step_sets_implicit_initial() {
        let definition = DefinitionBuilder::new()
            .state("idle")
            .transition("waiting", "insert_card", "wait_for_pin")
            .build()
            .unwrap();

        assert_eq!(definition.initial_state().unwrap().label(), "idle");
    }
}
