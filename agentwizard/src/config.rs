//! Wizard configuration.
//!
//! [`WizardConfig`] gathers everything an embedder may tune: the timeline a
//! session replays, the refinement backend and the tracing subscriber. It
//! loads from JSON with every field optional.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::errors::WizardError;
use crate::observability::TracingConfig;
use crate::refine::RefineConfig;
use crate::timeline::Timeline;

/// Top-level configuration for a [`WizardSession`](crate::session::WizardSession).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WizardConfig {
    /// The timeline each run replays.
    #[serde(default)]
    pub timeline: Timeline,
    /// Refinement backend settings.
    #[serde(default)]
    pub refine: RefineConfig,
    /// Tracing subscriber settings.
    #[serde(default)]
    pub tracing: TracingConfig,
}

impl WizardConfig {
    /// Creates a configuration with the reference timeline and defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the timeline.
    #[must_use]
    pub fn with_timeline(mut self, timeline: Timeline) -> Self {
        self.timeline = timeline;
        self
    }

    /// Sets the refinement settings.
    #[must_use]
    pub fn with_refine(mut self, refine: RefineConfig) -> Self {
        self.refine = refine;
        self
    }

    /// Sets the tracing settings.
    #[must_use]
    pub fn with_tracing(mut self, tracing: TracingConfig) -> Self {
        self.tracing = tracing;
        self
    }

    /// Fills a missing refinement credential from the environment.
    #[must_use]
    pub fn with_env_credentials(mut self) -> Self {
        self.refine = self.refine.with_env_credentials();
        self
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, WizardError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Loads a configuration from a JSON file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, WizardError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}
