//! Timeline and configuration fixtures.

use crate::context::ProjectConfig;
use crate::core::AgentCategory;
use crate::timeline::{StageDescriptor, Timeline};

/// Builds a timeline of `stages` uniform stages, cycling through every
/// category, with the reference trailing delay.
#[must_use]
pub fn quick_timeline(stages: usize, delay_ms: u64) -> Timeline {
    Timeline::new((0..stages).map(|i| {
        let category = AgentCategory::ALL[i % AgentCategory::ALL.len()];
        StageDescriptor::new(category, format!("step {i}"), delay_ms)
    }))
}

/// The project used by end-to-end tests.
#[must_use]
pub fn sample_project() -> ProjectConfig {
    ProjectConfig::new("CRM for gyms")
        .with_name("Acme")
        .with_target_audience("gym owners")
}
