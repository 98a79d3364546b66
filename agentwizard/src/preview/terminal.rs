//! Terminal rendering of log entries.

use serde::Serialize;
use std::fmt;

use crate::core::{Accent, AgentCategory, LogEntry, LogStatus};

/// Badge shown in the terminal corner while a run plays back.
pub const UPLINK_BADGE: &str = "Agent Uplink: Active";

/// Message colouring for a terminal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    /// Default text.
    Neutral,
    /// Green.
    Success,
    /// Red.
    Error,
}

impl From<LogStatus> for Tone {
    fn from(status: LogStatus) -> Self {
        match status {
            LogStatus::Error => Self::Error,
            LogStatus::Success => Self::Success,
            LogStatus::Info | LogStatus::Warning => Self::Neutral,
        }
    }
}

/// A log entry prepared for a terminal renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalLine {
    /// `HH:MM:SS` stamp.
    pub timestamp: String,
    /// Agent label.
    pub label: String,
    /// Label accent.
    pub accent: Accent,
    /// Message text.
    pub message: String,
    /// Message tone.
    pub tone: Tone,
}

impl TerminalLine {
    /// Prepares an entry for display.
    ///
    /// Labels that are not a known category get the green accent.
    #[must_use]
    pub fn from_entry(entry: &LogEntry) -> Self {
        let accent = entry
            .category
            .parse::<AgentCategory>()
            .map_or(Accent::Green, AgentCategory::accent);
        Self {
            timestamp: entry.timestamp.clone(),
            label: entry.category.clone(),
            accent,
            message: entry.message.clone(),
            tone: entry.status.into(),
        }
    }
}

impl fmt::Display for TerminalLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{}] {}", self.timestamp, self.label, self.message)
    }
}

/// Formats an entry as `HH:MM:SS [LABEL] message`.
#[must_use]
pub fn render_entry(entry: &LogEntry) -> String {
    TerminalLine::from_entry(entry).to_string()
}

/// Formats every entry of a log.
#[must_use]
pub fn render_log(entries: &[LogEntry]) -> Vec<String> {
    entries.iter().map(render_entry).collect()
}
