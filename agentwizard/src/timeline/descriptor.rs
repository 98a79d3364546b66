//! Stage descriptor: one scripted step of a timeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::core::{AgentCategory, LogEntry, LogStatus, StageOutcome};

/// Immutable description of one scripted stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageDescriptor {
    /// The agent the stage is attributed to.
    pub category: AgentCategory,
    /// The message logged when the stage is visited.
    pub message: String,
    /// How long playback suspends after this stage, in milliseconds.
    pub delay_ms: u64,
    /// Declared outcome; `None` is informational.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<StageOutcome>,
}

impl StageDescriptor {
    /// Creates a new informational stage.
    #[must_use]
    pub fn new(category: AgentCategory, message: impl Into<String>, delay_ms: u64) -> Self {
        Self {
            category,
            message: message.into(),
            delay_ms,
            outcome: None,
        }
    }

    /// Creates a stage that reports a completed milestone.
    #[must_use]
    pub fn success(category: AgentCategory, message: impl Into<String>, delay_ms: u64) -> Self {
        Self::new(category, message, delay_ms).with_outcome(StageOutcome::Success)
    }

    /// Sets the outcome.
    #[must_use]
    pub fn with_outcome(mut self, outcome: StageOutcome) -> Self {
        self.outcome = Some(outcome);
        self
    }

    /// Returns the post-stage delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Returns the log status this stage produces.
    #[must_use]
    pub fn status(&self) -> LogStatus {
        LogStatus::from_outcome(self.outcome)
    }

    /// Materializes the log entry for a visit to this stage.
    ///
    /// Each call produces a fresh id and timestamp.
    #[must_use]
    pub fn to_entry(&self) -> LogEntry {
        LogEntry::new(self.category.as_str(), self.message.clone(), self.status())
    }
}
