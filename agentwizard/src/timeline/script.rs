//! The reference build script replayed by the wizard.

use super::{StageDescriptor, Timeline};
use crate::core::AgentCategory::{
    AiImpl, Convex, Design, Landing, Nextjs, Orchestrator, Research, Tester,
};

/// Grace period between the last stage and completion.
pub const REFERENCE_TRAILING_DELAY_MS: u64 = 1000;

/// Builds the sixteen-stage reference timeline.
#[must_use]
pub fn reference_build() -> Timeline {
    Timeline::new([
        StageDescriptor::new(Orchestrator, "Initializing workflow parameters...", 800),
        StageDescriptor::new(Orchestrator, "Loading design-generator agent...", 1000),
        StageDescriptor::new(Design, "Analyzing project requirements...", 1500),
        StageDescriptor::new(Design, "Generating design system (Tailwind CSS)...", 1200),
        StageDescriptor::success(
            Design,
            "Design system complete. Dashboard/Landing UI created.",
            800,
        ),
        StageDescriptor::new(Convex, "Initializing backend infrastructure...", 1200),
        StageDescriptor::new(Convex, "Setting up schema.ts and auth.config.ts...", 1500),
        StageDescriptor::new(Research, "Connecting to Jina AI for documentation scrape...", 2000),
        StageDescriptor::new(Research, "Verifying AI SDK model signatures...", 1500),
        StageDescriptor::success(Research, "Documentation verified: Google Gemini 2.5 Flash", 1000),
        StageDescriptor::new(AiImpl, "Implementing AI features using Vercel AI SDK...", 2000),
        StageDescriptor::new(Landing, "Spawning 5 parallel agents for SEO pages...", 800),
        StageDescriptor::new(
            Landing,
            "Generating content: Features, Use Cases, Industry...",
            2500,
        ),
        StageDescriptor::new(Nextjs, "Building frontend application...", 2000),
        StageDescriptor::new(Tester, "Running Playwright visual regression tests...", 1500),
        StageDescriptor::success(Orchestrator, "Build complete. Preparing deployment...", 1000),
    ])
    .with_trailing_delay_ms(REFERENCE_TRAILING_DELAY_MS)
}
