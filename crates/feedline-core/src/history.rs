//! Query console history.
//!
//! An explicitly constructed, capacity-bounded record of executed console
//! queries. Owned by whoever runs queries and passed to whoever displays
//! them; there is deliberately no global accumulator.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default number of records retained before the oldest is evicted.
pub const DEFAULT_HISTORY_CAPACITY: usize = 50;

/// How an executed query ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum QueryOutcome {
    /// The query resolved; `data` is the shaped response.
    Success {
        /// Shaped response payload.
        data: Value,
    },
    /// The query failed; `message` is the human-readable reason.
    Error {
        /// Failure description.
        message: String,
    },
}

impl QueryOutcome {
    /// True for successful executions.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }
}

/// One executed query with its timing and outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryRecord {
    /// Opaque record id.
    pub id: String,
    /// The query text as submitted.
    pub query: String,
    /// Variables as submitted, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Value>,
    /// When execution started.
    pub executed_at: DateTime<Utc>,
    /// Wall time the execution took, in milliseconds.
    pub duration_ms: u64,
    /// Result of the execution.
    #[serde(flatten)]
    pub outcome: QueryOutcome,
}

/// Bounded, newest-first history of executed queries.
#[derive(Debug, Clone)]
pub struct QueryHistory {
    records: VecDeque<QueryRecord>,
    capacity: usize,
}

impl QueryHistory {
    /// Create a history with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_CAPACITY)
    }

    /// Create a history bounded to `capacity` records (at least one).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { records: VecDeque::with_capacity(capacity), capacity }
    }

    /// Record an execution, evicting the oldest record on overflow.
    pub fn record(&mut self, record: QueryRecord) {
        self.records.push_front(record);
        while self.records.len() > self.capacity {
            self.records.pop_back();
        }
    }

    /// Records, newest first.
    pub fn records(&self) -> impl Iterator<Item = &QueryRecord> {
        self.records.iter()
    }

    /// The most recent record, if any.
    pub fn latest(&self) -> Option<&QueryRecord> {
        self.records.front()
    }

    /// Remove a record by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        self.records.len() != before
    }

    /// Drop every record.
    pub fn clear(&mut self) {
        self.records.clear();
    }

    /// Number of retained records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no records are retained.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The configured capacity bound.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for QueryHistory {
    fn default() -> Self {
        Self::new()
    }
}
