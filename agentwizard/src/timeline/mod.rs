//! Timeline definitions.
//!
//! A [`Timeline`] is an ordered, immutable table of [`StageDescriptor`]s plus
//! the trailing grace delay that precedes completion. It is cheap to clone and
//! is handed to every run by value, so independent runs never share mutable
//! timeline state.

mod descriptor;
mod script;

pub use descriptor::StageDescriptor;
pub use script::{reference_build, REFERENCE_TRAILING_DELAY_MS};

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::WizardError;

/// An ordered, immutable sequence of stages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "TimelineDef", into = "TimelineDef")]
pub struct Timeline {
    stages: Arc<[StageDescriptor]>,
    trailing_delay_ms: u64,
}

/// Serialized form of a timeline.
#[derive(Serialize, Deserialize)]
struct TimelineDef {
    #[serde(default = "default_stages")]
    stages: Vec<StageDescriptor>,
    #[serde(default = "default_trailing_delay_ms")]
    trailing_delay_ms: u64,
}

fn default_stages() -> Vec<StageDescriptor> {
    reference_build().stages.to_vec()
}

fn default_trailing_delay_ms() -> u64 {
    REFERENCE_TRAILING_DELAY_MS
}

impl From<TimelineDef> for Timeline {
    fn from(def: TimelineDef) -> Self {
        Self::new(def.stages).with_trailing_delay_ms(def.trailing_delay_ms)
    }
}

impl From<Timeline> for TimelineDef {
    fn from(timeline: Timeline) -> Self {
        Self {
            stages: timeline.stages.to_vec(),
            trailing_delay_ms: timeline.trailing_delay_ms,
        }
    }
}

impl Default for Timeline {
    fn default() -> Self {
        reference_build()
    }
}

impl Timeline {
    /// Creates a timeline from stages, with the reference trailing delay.
    #[must_use]
    pub fn new(stages: impl IntoIterator<Item = StageDescriptor>) -> Self {
        Self {
            stages: stages.into_iter().collect(),
            trailing_delay_ms: REFERENCE_TRAILING_DELAY_MS,
        }
    }

    /// Creates a timeline with no stages.
    #[must_use]
    pub fn empty() -> Self {
        Self::new([])
    }

    /// Sets the trailing delay.
    #[must_use]
    pub fn with_trailing_delay_ms(mut self, trailing_delay_ms: u64) -> Self {
        self.trailing_delay_ms = trailing_delay_ms;
        self
    }

    /// Parses a timeline from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, WizardError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Returns the stages in playback order.
    #[must_use]
    pub fn stages(&self) -> &[StageDescriptor] {
        &self.stages
    }

    /// Returns the stage at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&StageDescriptor> {
        self.stages.get(index)
    }

    /// Iterates the stages in playback order.
    pub fn iter(&self) -> std::slice::Iter<'_, StageDescriptor> {
        self.stages.iter()
    }

    /// Returns the number of stages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Returns true if the timeline has no stages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Returns the grace delay between the last stage and completion.
    #[must_use]
    pub const fn trailing_delay(&self) -> Duration {
        Duration::from_millis(self.trailing_delay_ms)
    }

    /// Returns the wall-clock length of an uninterrupted run.
    #[must_use]
    pub fn total_duration(&self) -> Duration {
        self.iter()
            .map(StageDescriptor::delay)
            .fold(self.trailing_delay(), |total, delay| total + delay)
    }
}

impl<'a> IntoIterator for &'a Timeline {
    type Item = &'a StageDescriptor;
    type IntoIter = std::slice::Iter<'a, StageDescriptor>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
