//! Record of the transitions a machine has fired.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::time::Duration;

/// One fired transition.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Label of the state that was left
    pub from: String,
    /// Label of the transition that fired
    pub transition: String,
    /// Label of the state that was entered
    pub to: String,
    /// When the state pointer moved
    pub timestamp: DateTime<Utc>,
}

impl TransitionRecord {
    /// Record `transition` from `from` to `to`, stamped now.
    pub fn now(
        from: impl Into<String>,
        transition: impl Into<String>,
        to: impl Into<String>,
    ) -> Self {
        Self {
            from: from.into(),
            transition: transition.into(),
            to: to.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Ordered history of fired transitions.
///
/// With a limit set, the oldest records are dropped once the history holds
/// that many.
///
/// # Example
///
/// ```rust
/// use labelled_fsm::core::{StateHistory, TransitionRecord};
///
/// let mut history = StateHistory::new();
/// history.record(TransitionRecord::now("locked", "coin", "unlocked"));
/// history.record(TransitionRecord::now("unlocked", "push", "locked"));
///
/// assert_eq!(history.get_path(), vec!["locked", "unlocked", "locked"]);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateHistory {
    records: VecDeque<TransitionRecord>,
    limit: Option<usize>,
}

impl StateHistory {
    /// Create an empty, unbounded history.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty history that keeps at most `limit` records.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::new(),
            limit: Some(limit),
        }
    }

    /// Append a record, evicting the oldest one when over the limit.
    pub fn record(&mut self, record: TransitionRecord) {
        self.records.push_back(record);
        if let Some(limit) = self.limit {
            while self.records.len() > limit {
                self.records.pop_front();
            }
        }
    }

    /// Labels of the states traversed: the first record's source, then the
    /// destination of every record.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.from.as_str());
        }
        path.extend(self.records.iter().map(|r| r.to.as_str()));
        path
    }

    /// Time between the first and last record, `None` when empty.
    pub fn duration(&self) -> Option<Duration> {
        let (first, last) = (self.records.front()?, self.records.back()?);
        Some(
            last.timestamp
                .signed_duration_since(first.timestamp)
                .to_std()
                .unwrap_or(Duration::ZERO),
        )
    }

    pub fn records(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
    }
}
