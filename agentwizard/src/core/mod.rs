//! Core domain model types.
//!
//! This module contains the fundamental types shared by every other module:
//! - Agent categories and their display accents
//! - Stage outcomes and log statuses
//! - The log entry emitted per stage

mod entry;
mod status;

pub use entry::LogEntry;
pub use status::{Accent, AgentCategory, LogStatus, StageOutcome};
