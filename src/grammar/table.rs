//! State-transition table view of a definition.

use crate::core::Definition;
use std::collections::BTreeSet;
use std::fmt;

/// Marker for a state with no transition of a given label.
pub const EMPTY_CELL: &str = "...";

/// One row of a [`TransitionTable`]: where a transition label leads from
/// each state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableRow {
    pub transition: String,
    /// One cell per state column, `None` where the label does not leave
    /// that state.
    pub destinations: Vec<Option<String>>,
}

/// Grid of destinations, one column per state and one row per transition
/// label, both in label order.
///
/// ```rust
/// use labelled_fsm::core::Definition;
///
/// let definition: Definition = "locked -> unlocked (coin); unlocked -> locked (push)"
///     .parse()
///     .unwrap();
/// let table = definition.transition_table();
///
/// assert_eq!(table.destination("locked", "coin"), Some("unlocked"));
/// assert_eq!(table.destination("locked", "push"), None);
/// assert_eq!(
///     table.to_string(),
///     "locked | unlocked\ncoin: unlocked | ...\npush: ... | locked\n"
/// );
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransitionTable {
    pub states: Vec<String>,
    pub rows: Vec<TableRow>,
}

impl TransitionTable {
    /// Destination of `transition` from `state`, if that transition exists.
    pub fn destination(&self, state: &str, transition: &str) -> Option<&str> {
        let column = self.states.iter().position(|s| s == state)?;
        self.rows
            .iter()
            .find(|row| row.transition == transition)?
            .destinations
            .get(column)?
            .as_deref()
    }
}

impl fmt::Display for TransitionTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.states.join(" | "))?;
        for row in &self.rows {
            let cells: Vec<&str> = row
                .destinations
                .iter()
                .map(|cell| cell.as_deref().unwrap_or(EMPTY_CELL))
                .collect();
            writeln!(f, "{}: {}", row.transition, cells.join(" | "))?;
        }
        Ok(())
    }
}

impl Definition {
    /// Tabulate the definition as states × transition labels.
    pub fn transition_table(&self) -> TransitionTable {
        let states: Vec<String> = self.states().map(|s| s.label().to_string()).collect();
        let labels: BTreeSet<&str> = self.states().flat_map(|s| s.transition_labels()).collect();

        let rows = labels
            .into_iter()
            .map(|label| TableRow {
                transition: label.to_string(),
                destinations: self
                    .states()
                    .map(|state| {
                        state
                            .transition(label)
                            .map(|t| t.destination().to_string())
                    })
                    .collect(),
            })
            .collect();

        TransitionTable { states, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_definition_has_empty_table() {
        let table = Definition::new().transition_table();

        assert!(table.states.is_empty());
        assert!(table.rows.is_empty());
        assert_eq!(table.to_string(), "\n");
    }

    #[test]
    fn turnstile_table_is_complete() {
        let definition: Definition = "locked -> locked (push); locked -> unlocked (coin);
                                      unlocked -> locked (push); unlocked -> unlocked (coin);"
            .parse()
            .unwrap();

        let table = definition.transition_table();
        assert_eq!(table.states, vec!["locked", "unlocked"]);
        assert_eq!(
            table.to_string(),
            "locked | unlocked\ncoin: unlocked | unlocked\npush: locked | locked\n"
        );
    }

    #[test]
    fn destination_handles_unknown_coordinates() {
        let definition: Definition = "a -> b (go)".parse().unwrap();
        let table = definition.transition_table();

        assert_eq!(table.destination("a", "go"), Some("b"));
        assert_eq!(table.destination("b", "go"), None);
        assert_eq!(table.destination("z", "go"), None);
        assert_eq!(table.destination("a", "stop"), None);
    }
}
