//! Testing utilities for wizard sessions.
//!
//! This module provides:
//! - Small timelines and sample projects
//! - Scripted text generators for the refinement boundary

mod fixtures;
mod mocks;

pub use fixtures::{quick_timeline, sample_project};
pub use mocks::{FailingGenerator, StaticGenerator};
