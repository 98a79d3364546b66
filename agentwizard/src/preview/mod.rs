//! Presentation models for the three wizard screens.
//!
//! These are plain view models: the build terminal, the phase stepper and the
//! dashboard revealed on completion. Rendering them is left to the embedder.

mod dashboard;
mod progress;
mod terminal;

pub use dashboard::{
    ActivityItem, DashboardPreview, PlanUsage, StatCard, PREVIEW_URL, RESET_ACTION_LABEL,
};
pub use progress::{headline, PhaseStep, PhaseSteps, StepMarker, PROCESSING_SUBHEADLINE};
pub use terminal::{render_entry, render_log, TerminalLine, Tone, UPLINK_BADGE};
