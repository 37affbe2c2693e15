//! Bounded history of fired transitions.

use super::event::Status;
use super::time::Timestamp;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Record of one fired transition.
///
/// `source` is the state that owned the transition (possibly a composite
/// reached by bubbling), `target` is the leaf active once entry finished.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub source: String,
    pub target: String,
    /// Class of the event that triggered the transition.
    pub event: String,
    /// Engine timestamp passed to `dispatch`.
    pub at: Timestamp,
    /// Status left by the last action or hook of the transition.
    pub status: Status,
    /// Wall-clock instant at which the transition was recorded.
    pub recorded_at: DateTime<Utc>,
}

/// Ordered, size-limited history of transitions.
///
/// Once `limit` records are held, recording drops the oldest one. A limit
/// of zero keeps nothing.
///
/// # Example
///
/// ```rust
/// use chrono::Utc;
/// use statechart::core::{Status, TransitionHistory, TransitionRecord};
///
/// let mut history = TransitionHistory::with_limit(8);
/// history.record(TransitionRecord {
///     source: "IDLE".into(),
///     target: "RUNNING".into(),
///     event: "Go".into(),
///     at: 10,
///     status: Status::OK,
///     recorded_at: Utc::now(),
/// });
///
/// assert_eq!(history.get_path(), ["IDLE", "RUNNING"]);
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TransitionHistory {
    records: VecDeque<TransitionRecord>,
    limit: usize,
}

impl TransitionHistory {
    pub fn with_limit(limit: usize) -> Self {
        Self {
            records: VecDeque::with_capacity(limit.min(64)),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Whether records are kept at all.
    pub fn is_enabled(&self) -> bool {
        self.limit > 0
    }

    pub fn record(&mut self, record: TransitionRecord) {
        if self.limit == 0 {
            return;
        }
        while self.records.len() >= self.limit {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    /// Records from oldest to newest.
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

    /// The leaf sequence: the first record's source, then every target.
    pub fn get_path(&self) -> Vec<&str> {
        let mut path = Vec::with_capacity(self.records.len() + 1);
        if let Some(first) = self.records.front() {
            path.push(first.source.as_str());
        }
        path.extend(self.records.iter().map(|record| record.target.as_str()));
        path
    }
}

impl Default for TransitionHistory {
    fn default() -> Self {
        Self::with_limit(64)
    }
}
