//! Machine configuration.

use serde::{Deserialize, Serialize};

/// Default number of history records a machine keeps.
pub const DEFAULT_HISTORY_LIMIT: usize = 1024;

/// Settings for a [`Machine`](super::Machine).
///
/// Every field has a default, so a partial document deserializes:
///
/// ```rust
/// use labelled_fsm::machine::MachineConfig;
///
/// let config: MachineConfig = serde_json::from_str(r#"{"history_limit": 16}"#).unwrap();
/// assert!(config.record_history);
/// assert_eq!(config.history_limit, Some(16));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MachineConfig {
    /// Keep a record of fired transitions
    pub record_history: bool,

    /// Drop the oldest records past this many; `None` keeps everything
    pub history_limit: Option<usize>,
}

impl MachineConfig {
    /// Configuration with history recording switched off.
    pub fn without_history() -> Self {
        Self {
            record_history: false,
            ..Self::default()
        }
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self {
            record_history: true,
            history_limit: Some(DEFAULT_HISTORY_LIMIT),
        }
    }
}
