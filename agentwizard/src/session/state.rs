//! Wizard run state.

use serde::{Deserialize, Serialize};

use crate::context::ProjectConfig;
use crate::pipeline::Phase;

/// The screen a wizard shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    /// The configuration form.
    Config,
    /// The build terminal.
    Processing,
    /// The dashboard preview.
    Preview,
}

/// Lifecycle state of a session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RunState {
    /// No run has been requested yet.
    #[default]
    Idle,
    /// The form is being edited after a reset.
    Configuring,
    /// A run is playing back.
    Running {
        /// Index of the most recently emitted stage.
        stage_index: usize,
        /// Derived phase.
        phase: Phase,
    },
    /// The run finished; the preview is available.
    Complete(ProjectConfig),
}

impl RunState {
    /// Projects the state onto the three wizard screens.
    #[must_use]
    pub const fn step(&self) -> WizardStep {
        match self {
            Self::Idle | Self::Configuring => WizardStep::Config,
            Self::Running { .. } => WizardStep::Processing,
            Self::Complete(_) => WizardStep::Preview,
        }
    }

    /// Returns true while a run is playing back.
    #[must_use]
    pub const fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Returns true once a run has completed.
    #[must_use]
    pub const fn is_complete(&self) -> bool {
        matches!(self, Self::Complete(_))
    }

    /// Returns the active stage index while running.
    #[must_use]
    pub const fn stage_index(&self) -> Option<usize> {
        match self {
            Self::Running { stage_index, .. } => Some(*stage_index),
            _ => None,
        }
    }

    /// Returns the completed configuration.
    #[must_use]
    pub const fn completed_config(&self) -> Option<&ProjectConfig> {
        match self {
            Self::Complete(config) => Some(config),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_projection() {
        assert_eq!(RunState::Idle.step(), WizardStep::Config);
        assert_eq!(RunState::Configuring.step(), WizardStep::Config);
        assert_eq!(
            RunState::Running {
                stage_index: 3,
                phase: Phase::Design
            }
            .step(),
            WizardStep::Processing
        );
        assert_eq!(
            RunState::Complete(ProjectConfig::default()).step(),
            WizardStep::Preview
        );
    }

    #[test]
    fn test_accessors() {
        let running = RunState::Running {
            stage_index: 7,
            phase: Phase::Backend,
        };
        assert!(running.is_running());
        assert_eq!(running.stage_index(), Some(7));
        assert!(running.completed_config().is_none());

        let complete = RunState::Complete(ProjectConfig::new("CRM").with_name("Acme"));
        assert!(complete.is_complete());
        assert_eq!(complete.completed_config().unwrap().name, "Acme");
        assert_eq!(RunState::default(), RunState::Idle);
    }

    #[test]
    fn test_serialization_tags_state() {
        let value = serde_json::to_value(RunState::Running {
            stage_index: 2,
            phase: Phase::Design,
        })
        .unwrap();

        assert_eq!(value["state"], "running");
        assert_eq!(value["stage_index"], 2);
        assert_eq!(value["phase"], "design");
    }
}
