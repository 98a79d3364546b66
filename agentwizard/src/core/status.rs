//! Agent category, stage outcome and log status enums.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The scripted agent a stage is attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AgentCategory {
    /// Workflow coordinator.
    Orchestrator,
    /// Design-system generator.
    Design,
    /// Documentation research.
    Research,
    /// Backend provisioning.
    Convex,
    /// AI feature implementation.
    AiImpl,
    /// Landing and SEO page generation.
    Landing,
    /// Frontend build.
    Nextjs,
    /// Visual regression testing.
    Tester,
}

impl AgentCategory {
    /// Every category, in declaration order.
    pub const ALL: [Self; 8] = [
        Self::Orchestrator,
        Self::Design,
        Self::Research,
        Self::Convex,
        Self::AiImpl,
        Self::Landing,
        Self::Nextjs,
        Self::Tester,
    ];

    /// Returns the uppercase label shown in log lines.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Orchestrator => "ORCHESTRATOR",
            Self::Design => "DESIGN",
            Self::Research => "RESEARCH",
            Self::Convex => "CONVEX",
            Self::AiImpl => "AI_IMPL",
            Self::Landing => "LANDING",
            Self::Nextjs => "NEXTJS",
            Self::Tester => "TESTER",
        }
    }

    /// Returns the terminal accent used for this agent's label.
    #[must_use]
    pub const fn accent(self) -> Accent {
        match self {
            Self::Orchestrator => Accent::Purple,
            Self::Design => Accent::Pink,
            Self::Research => Accent::Blue,
            Self::Convex => Accent::Orange,
            Self::AiImpl | Self::Landing | Self::Nextjs | Self::Tester => Accent::Green,
        }
    }
}

impl fmt::Display for AgentCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AgentCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == s)
            .ok_or_else(|| format!("unknown agent category: {s}"))
    }
}

/// Display accent for agent labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Accent {
    /// Orchestrator.
    Purple,
    /// Design.
    Pink,
    /// Research.
    Blue,
    /// Backend.
    Orange,
    /// Everything else.
    Green,
}

/// Declared outcome of a scripted stage.
///
/// Absence of an outcome means the stage is neutral/informational.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageOutcome {
    /// The stage reports a completed milestone.
    Success,
}

/// Severity of an emitted log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogStatus {
    /// Neutral progress line.
    Info,
    /// Milestone reached.
    Success,
    /// Something worth a look.
    Warning,
    /// Something failed.
    Error,
}

impl Default for LogStatus {
    fn default() -> Self {
        Self::Info
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl From<StageOutcome> for LogStatus {
    fn from(outcome: StageOutcome) -> Self {
        match outcome {
            StageOutcome::Success => Self::Success,
        }
    }
}

impl LogStatus {
    /// Maps an optional stage outcome to a log status, defaulting to `Info`.
    #[must_use]
    pub fn from_outcome(outcome: Option<StageOutcome>) -> Self {
        outcome.map_or(Self::Info, Self::from)
    }
}
