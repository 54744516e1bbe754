//! Render history.
//!
//! Every successful render appends one [`RenderRecord`] to the
//! [`HistoryStore`] owned by the engine that performed it. The store is
//! append-only apart from an explicit [`HistoryStore::clear`].

use crate::variables::Variables;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// One completed render operation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderRecord {
    /// Name of the template that was rendered.
    pub template_name: String,

    /// Copy of the variables the render was called with.
    pub variables: Variables,

    /// Rendered output.
    pub result: String,

    /// When the render completed.
    pub timestamp: DateTime<Utc>,
}

impl RenderRecord {
    /// Creates a record stamped with the current time.
    pub fn new(
        template_name: impl Into<String>,
        variables: Variables,
        result: impl Into<String>,
    ) -> Self {
        Self {
            template_name: template_name.into(),
            variables,
            result: result.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Append-only, thread-safe log of render operations.
///
/// Appends from concurrent renders are serialized by a mutex, so the stored
/// order is the order in which the appends acquired the lock.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: Mutex<Vec<RenderRecord>>,
}

impl HistoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // Records are only ever pushed whole, so a poisoned lock still guards a
    // consistent vector.
    fn lock(&self) -> MutexGuard<'_, Vec<RenderRecord>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Appends a record to the end of the log.
    pub fn append(&self, record: RenderRecord) {
        self.lock().push(record);
    }

    /// Returns a snapshot of all records in append order.
    pub fn all(&self) -> Vec<RenderRecord> {
        self.lock().clone()
    }

    /// Returns the most recent record, if any.
    pub fn last(&self) -> Option<RenderRecord> {
        self.lock().last().cloned()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` if no render has been recorded.
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Discards every record.
    pub fn clear(&self) {
        self.lock().clear();
    }
}
