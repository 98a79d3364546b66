//! Timeline playback and phase derivation.
//!
//! This module provides:
//! - The [`Sequencer`] state machine that replays a timeline
//! - The sticky [`PhaseTracker`] that collapses categories into phases

mod phase;
mod sequencer;

pub use phase::{Phase, PhaseMap, PhaseTracker};
pub use sequencer::{Progress, RunOutcome, Sequencer, Step};
