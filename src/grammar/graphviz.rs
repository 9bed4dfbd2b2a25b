//! One-way export to GraphViz `dot`.

use crate::core::Definition;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Node id of the synthetic start marker.
pub const START_NODE: &str = "__start";

/// Layout direction of the rendered graph.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RankDirection {
    TB,
    LR,
    BT,
    RL,
}

impl RankDirection {
    fn as_str(self) -> &'static str {
        match self {
            RankDirection::TB => "TB",
            RankDirection::LR => "LR",
            RankDirection::BT => "BT",
            RankDirection::RL => "RL",
        }
    }
}

/// Rendering options for [`Definition::graph_viz_with`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphVizOptions {
    /// Emit a `rankdir` attribute; GraphViz defaults to top-to-bottom
    pub rank_direction: Option<RankDirection>,

    /// Draw this state with a double border
    pub highlight: Option<String>,
}

impl Definition {
    /// Render the definition as a GraphViz `digraph`.
    ///
    /// The output has a small filled start node pointing at the initial
    /// state, one node per state and one labelled edge per transition.
    /// There is no way to read it back.
    ///
    /// ```rust
    /// use labelled_fsm::core::Definition;
    ///
    /// let definition: Definition = "locked -> unlocked (coin)".parse().unwrap();
    /// let dot = definition.graph_viz();
    ///
    /// assert!(dot.starts_with("digraph {\n"));
    /// assert!(dot.contains("\t__start -> \"locked\"\n"));
    /// assert!(dot.contains("\t\"locked\" -> \"unlocked\" [label=\"coin\"]\n"));
    /// ```
    pub fn graph_viz(&self) -> String {
        self.graph_viz_with(&GraphVizOptions::default())
    }

    /// Render the definition as a GraphViz `digraph` with extra options.
    pub fn graph_viz_with(&self, options: &GraphVizOptions) -> String {
        let mut dot = String::from("digraph {\n");

        if let Some(direction) = options.rank_direction {
            let _ = writeln!(dot, "\trankdir={}", direction.as_str());
        }
        dot.push_str("\tnode [shape=circle, height=1, width=1]\n");

        let initial = self.initial_state();
        if initial.is_some() {
            let _ = writeln!(
                dot,
                "\t{START_NODE} [label=\"\", shape=circle, style=filled, color=black, height=0.25, width=0.25]"
            );
        }

        for state in self.states() {
            let id = quote(state.label());
            if options.highlight.as_deref() == Some(state.label()) {
                let _ = writeln!(dot, "\t{id} [label={id}, peripheries=2]");
            } else {
                let _ = writeln!(dot, "\t{id} [label={id}]");
            }
        }

        if let Some(initial) = initial {
            let _ = writeln!(dot, "\t{START_NODE} -> {}", quote(initial.label()));
        }

        for state in self.states() {
            for transition in state.transitions() {
                let _ = writeln!(
                    dot,
                    "\t{} -> {} [label={}]",
                    quote(state.label()),
                    quote(transition.destination()),
                    quote(transition.label())
                );
            }
        }

        dot.push_str("}\n");
        dot
    }
}

/// Quote `text` as a dot string id.
fn quote(text: &str) -> String {
    let mut quoted = String::with_capacity(text.len() + 2);
    quoted.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            quoted.push('\\');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
