//! Execution engine.
//!
//! A [`Machine`] holds a current-state pointer into a borrowed
//! [`Definition`](crate::core::Definition), evaluates gates and fires hooks
//! in a fixed order:
//!
//! 1. exit action of the state being left
//! 2. move to the destination
//! 3. entry action of the new state
//! 4. the transition's own action
//!
//! Everything runs synchronously on the caller's thread. Nothing is
//! retried or rolled back.

mod config;
mod engine;
mod error;

pub use config::{MachineConfig, DEFAULT_HISTORY_LIMIT};
pub use engine::Machine;
pub use error::MachineError;
