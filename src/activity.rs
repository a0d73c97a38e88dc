//! Append-only activity log shared by nodes and orchestrators.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single audit-trail record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityRecord {
    pub activity: String,
    pub timestamp: DateTime<Utc>,
    pub details: Option<Value>,
}

/// Append-only sequence of [`ActivityRecord`]s
///
/// Entries can be appended and read, never edited or removed.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ActivityLog {
    entries: Vec<ActivityRecord>,
}

impl ActivityLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record stamped with the current time
    pub fn append(&mut self, activity: impl Into<String>, details: Option<Value>) -> &ActivityRecord {
        self.entries.push(ActivityRecord {
            activity: activity.into(),
            timestamp: Utc::now(),
            details,
        });
        // just pushed, so the log is non-empty
        &self.entries[self.entries.len() - 1]
    }

    pub fn entries(&self) -> &[ActivityRecord] {
        &self.entries
    }

    pub fn last(&self) -> Option<&ActivityRecord> {
        self.entries.last()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
