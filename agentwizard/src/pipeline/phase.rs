//! Stage-to-phase mapping.
//!
//! Fine-grained agent categories collapse into six coarse phases that drive a
//! progress indicator. The mapping is an explicit lookup table; the
//! [`PhaseTracker`] applies it with a sticky, never-regress rule so the
//! derived phase is monotonic whatever order the timeline visits categories in.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::core::AgentCategory;

/// Coarse progress phase.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Workflow start.
    #[default]
    Init,
    /// Design system generation.
    Design,
    /// Documentation research.
    Research,
    /// Backend provisioning.
    Backend,
    /// AI feature implementation.
    AiLogic,
    /// Frontend build and test.
    Build,
}

impl Phase {
    /// Every phase, in progress order.
    pub const ALL: [Self; 6] = [
        Self::Init,
        Self::Design,
        Self::Research,
        Self::Backend,
        Self::AiLogic,
        Self::Build,
    ];

    /// Returns the zero-based step index.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the phase at a step index.
    #[must_use]
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Returns the label shown on the progress stepper.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Init => "Init",
            Self::Design => "Design",
            Self::Research => "Research",
            Self::Backend => "Backend",
            Self::AiLogic => "AI Logic",
            Self::Build => "Build",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Lookup table from agent category to phase.
///
/// Categories without an entry do not move the phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseMap {
    table: HashMap<AgentCategory, Phase>,
}

impl Default for PhaseMap {
    fn default() -> Self {
        Self::empty()
            .with_mapping(AgentCategory::Design, Phase::Design)
            .with_mapping(AgentCategory::Research, Phase::Research)
            .with_mapping(AgentCategory::Convex, Phase::Backend)
            .with_mapping(AgentCategory::AiImpl, Phase::AiLogic)
            .with_mapping(AgentCategory::Nextjs, Phase::Build)
    }
}

impl PhaseMap {
    /// Creates a map with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
        }
    }

    /// Adds or replaces a mapping.
    #[must_use]
    pub fn with_mapping(mut self, category: AgentCategory, phase: Phase) -> Self {
        self.table.insert(category, phase);
        self
    }

    /// Looks up the phase for a category.
    #[must_use]
    pub fn phase_for(&self, category: AgentCategory) -> Option<Phase> {
        self.table.get(&category).copied()
    }
}

/// Derives the current phase from the stream of visited categories.
#[derive(Debug, Clone)]
pub struct PhaseTracker {
    map: PhaseMap,
    current: Phase,
}

impl Default for PhaseTracker {
    fn default() -> Self {
        Self::new(PhaseMap::default())
    }
}

impl PhaseTracker {
    /// Creates a tracker at [`Phase::Init`].
    #[must_use]
    pub fn new(map: PhaseMap) -> Self {
        Self {
            map,
            current: Phase::Init,
        }
    }

    /// Returns the current phase.
    #[must_use]
    pub const fn current(&self) -> Phase {
        self.current
    }

    /// Observes a visited category and returns the resulting phase.
    ///
    /// Unmapped categories keep the current phase; a mapping to an earlier
    /// phase than the current one is ignored.
    pub fn observe(&mut self, category: AgentCategory) -> Phase {
        if let Some(mapped) = self.map.phase_for(category) {
            self.current = self.current.max(mapped);
        }
        self.current
    }

    /// Returns the tracker to [`Phase::Init`].
    pub fn reset(&mut self) {
        self.current = Phase::Init;
    }
}
