//! Reading the `SOURCE -> DEST (LABEL);` grammar into a definition.

use super::error::GrammarError;
use crate::core::{Definition, Transition};
use regex::Regex;
use std::str::FromStr;
use std::sync::LazyLock;

const COMMENT: char = '#';
const TERMINATOR: char = ';';

// Identifiers are ASCII only.
static RULE: LazyLock<Regex> = LazyLock::new(|| {
    let ident = r"([A-Za-z0-9_.\-]+)";
    Regex::new(&format!(r"^{ident}\s*->\s*{ident}\s*\(\s*{ident}\s*\)$"))
        .expect("valid transition rule regex")
});

/// One parsed `SOURCE -> DEST (LABEL)` statement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rule<'a> {
    pub source: &'a str,
    pub destination: &'a str,
    pub label: &'a str,
}

impl<'a> Rule<'a> {
    /// Match a single statement, with whitespace already collapsed.
    pub fn parse(statement: &'a str) -> Option<Self> {
        let captures = RULE.captures(statement)?;
        Some(Self {
            source: captures.get(1)?.as_str(),
            destination: captures.get(2)?.as_str(),
            label: captures.get(3)?.as_str(),
        })
    }
}

/// Split grammar text into statements.
///
/// Each physical line is cut at its first `#`, the remaining text is split
/// on `;`, whitespace runs are collapsed to single spaces and blank
/// statements are dropped.
pub fn statements(text: &str) -> Vec<String> {
    let code = text
        .lines()
        .map(|line| line.split_once(COMMENT).map_or(line, |(code, _)| code))
        .collect::<Vec<_>>()
        .join("\n");

    code.split(TERMINATOR)
        .map(|statement| statement.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|statement| !statement.is_empty())
        .collect()
}

impl Definition {
    /// Add every rule in `text` to this definition.
    ///
    /// Rules are applied in order. Unknown state labels are created on first
    /// mention, so the first label seen becomes the initial state if none is
    /// set yet. A rule replaces any transition with the same label already
    /// leaving its source state.
    ///
    /// Returns the number of statements applied. Parsing stops at the first
    /// statement that is not a rule; statements before it stay applied. Use
    /// [`str::parse`] to build a fresh definition when that matters.
    ///
    /// # Example
    ///
    /// ```rust
    /// use labelled_fsm::core::Definition;
    /// use labelled_fsm::grammar::GrammarError;
    ///
    /// let mut definition = Definition::new();
    /// let applied = definition
    ///     .process_definition_formats(
    ///         "# Coin machine
    ///          locked -> locked (push);
    ///          locked -> unlocked (coin); # trailing comment
    ///
    ///          unlocked -> locked (push);
    ///          unlocked -> unlocked (coin);",
    ///     )
    ///     .unwrap();
    /// assert_eq!(applied, 4);
    ///
    /// let err = definition.process_definition_formats("a -> b (c); a -> b c").unwrap_err();
    /// assert_eq!(err, GrammarError::InvalidRule { applied: 1, statement: "a -> b c".into() });
    /// ```
    pub fn process_definition_formats(&mut self, text: &str) -> Result<usize, GrammarError> {
        let mut applied = 0;
        for statement in statements(text) {
            let Some(rule) = Rule::parse(&statement) else {
                tracing::debug!(applied, %statement, "invalid rule");
                return Err(GrammarError::InvalidRule { applied, statement });
            };
            self.apply_rule(rule);
            applied += 1;
        }
        tracing::trace!(applied, states = self.len(), "definition formats processed");
        Ok(applied)
    }

    fn apply_rule(&mut self, rule: Rule<'_>) {
        self.state_for_label(rule.source);
        self.state_for_label(rule.destination);
        self.state_for_label(rule.source)
            .add_transition(Transition::new(rule.label, rule.destination));
    }
}

impl FromStr for Definition {
    type Err = GrammarError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut definition = Definition::new();
        definition.process_definition_formats(text)?;
        Ok(definition)
    }
}
