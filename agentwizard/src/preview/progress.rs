//! Phase stepper shown while a run plays back.

use serde::Serialize;

use crate::context::ProjectConfig;
use crate::pipeline::Phase;

/// Line shown under the headline while processing.
pub const PROCESSING_SUBHEADLINE: &str = "Orchestrating agents to build your application.";

/// Marker of one step relative to the current phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepMarker {
    /// Before the current phase.
    Done,
    /// The current phase.
    Active,
    /// After the current phase.
    Pending,
}

/// One step of the stepper.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseStep {
    /// The phase this step stands for.
    pub phase: Phase,
    /// One-based step number.
    pub number: usize,
    /// Display label.
    pub label: &'static str,
    /// Marker relative to the current phase.
    pub marker: StepMarker,
}

/// All six steps for a given current phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PhaseSteps {
    steps: Vec<PhaseStep>,
}

impl PhaseSteps {
    /// Builds the stepper for `current`.
    #[must_use]
    pub fn for_phase(current: Phase) -> Self {
        let steps = Phase::ALL
            .iter()
            .map(|&phase| PhaseStep {
                phase,
                number: phase.index() + 1,
                label: phase.label(),
                marker: match phase.cmp(&current) {
                    std::cmp::Ordering::Less => StepMarker::Done,
                    std::cmp::Ordering::Equal => StepMarker::Active,
                    std::cmp::Ordering::Greater => StepMarker::Pending,
                },
            })
            .collect();
        Self { steps }
    }

    /// Returns the steps in order.
    #[must_use]
    pub fn steps(&self) -> &[PhaseStep] {
        &self.steps
    }

    /// Returns the active step.
    #[must_use]
    pub fn active(&self) -> Option<&PhaseStep> {
        self.steps
            .iter()
            .find(|step| step.marker == StepMarker::Active)
    }
}

/// Returns the processing headline for a project.
#[must_use]
pub fn headline(config: &ProjectConfig) -> String {
    format!("Constructing {}...", config.name)
}
