//! labelled-fsm: an embeddable finite-state-machine engine
//!
//! Declare states and labelled transitions, attach gates and hooks, and
//! drive a machine by submitting transition labels. Topology can be read
//! from and written to a compact text grammar, and exported to GraphViz.
//!
//! # Core Concepts
//!
//! - **Definition**: the static graph of states and transitions
//! - **Machine**: a current-state cursor bound to one definition
//! - **Gate**: a predicate deciding whether a transition may fire
//! - **Action**: a hook run on exit, entry, or when a transition fires
//! - **Grammar**: `SOURCE -> DEST (LABEL);` statements
//!
//! # Example
//!
//! ```rust
//! use labelled_fsm::core::Definition;
//! use labelled_fsm::machine::Machine;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use std::sync::Arc;
//!
//! let mut definition: Definition = "
//!     locked -> locked (push);
//!     locked -> unlocked (coin);
//!     unlocked -> locked (push);
//!     unlocked -> unlocked (coin);"
//!     .parse()
//!     .unwrap();
//!
//! let clunks = Arc::new(AtomicUsize::new(0));
//! let counter = Arc::clone(&clunks);
//! definition
//!     .state_mut("unlocked")
//!     .unwrap()
//!     .on_entry(move |_| {
//!         counter.fetch_add(1, Ordering::SeqCst);
//!     });
//!
//! let mut machine = Machine::new(&definition).unwrap();
//! machine.perform_transition("coin").unwrap();
//! machine.perform_transition("push").unwrap();
//!
//! assert!(machine.is_in("locked"));
//! assert_eq!(clunks.load(Ordering::SeqCst), 1);
//! ```

pub mod builder;
pub mod core;
pub mod grammar;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, DefinitionBuilder};
pub use core::{Action, Definition, DefinitionError, Gate, State, Transition};
pub use grammar::GrammarError;
pub use machine::{Machine, MachineConfig, MachineError};
