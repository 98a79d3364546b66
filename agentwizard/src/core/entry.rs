//! Log entry emitted once per visited stage.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::LogStatus;
use crate::utils::{clock_timestamp, generate_uuid};

/// One line of the simulated build log.
///
/// Entries are created exactly once, as the sequencer visits a stage, and are
/// never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Unique token for this entry.
    pub id: Uuid,
    /// Agent label, e.g. `DESIGN`.
    #[serde(rename = "agent")]
    pub category: String,
    /// Human-readable message.
    pub message: String,
    /// Local wall-clock time as `HH:MM:SS`.
    pub timestamp: String,
    /// Severity.
    pub status: LogStatus,
}

impl LogEntry {
    /// Creates a new entry stamped with a fresh id and the current time.
    #[must_use]
    pub fn new(category: impl Into<String>, message: impl Into<String>, status: LogStatus) -> Self {
        Self {
            id: generate_uuid(),
            category: category.into(),
            message: message.into(),
            timestamp: clock_timestamp(),
            status,
        }
    }

    /// Creates an informational entry.
    #[must_use]
    pub fn info(category: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(category, message, LogStatus::Info)
    }

    /// Overrides the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = timestamp.into();
        self
    }

    /// Returns true if this entry marks a completed milestone.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == LogStatus::Success
    }
}
