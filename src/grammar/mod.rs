//! Text codec for definitions.
//!
//! The grammar is one rule per `;`-terminated statement:
//!
//! ```text
//! statement  := identifier "->" identifier "(" identifier ")"
//! identifier := [A-Za-z0-9_.-]+
//! comment    := "#" <rest of physical line>
//! ```
//!
//! Statements may span lines, the final `;` is optional, and blank or
//! comment-only lines are ignored.
//!
//! Reading ([`Definition::process_definition_formats`]) and writing
//! ([`Definition::definition_formats`]) cover topology only. GraphViz and
//! table output are export-only views. None of this is used while a
//! machine runs.
//!
//! [`Definition::process_definition_formats`]: crate::core::Definition::process_definition_formats
//! [`Definition::definition_formats`]: crate::core::Definition::definition_formats

mod error;
mod format;
mod graphviz;
mod parser;
mod table;

pub use error::GrammarError;
pub use graphviz::{GraphVizOptions, RankDirection, START_NODE};
pub use parser::{statements, Rule};
pub use table::{TableRow, TransitionTable, EMPTY_CELL};
