//! Optional AI-assisted refinement of project descriptions.
//!
//! The [`Refiner`] is the only component that crosses an external boundary.
//! It never fails: a missing credential yields a deterministic offline text,
//! and transport or service errors yield a fixed explanatory string.

mod config;
#[cfg(feature = "refine-http")]
mod gemini;
mod generator;
mod refiner;

pub use config::{RefineConfig, CREDENTIAL_ENV_VARS};
#[cfg(feature = "refine-http")]
pub use gemini::GeminiClient;
pub use generator::{GenerationRequest, TextGenerator, REFINEMENT_SYSTEM_PROMPT};
pub use refiner::{fallback_refinement, Refiner, EMPTY_REFINEMENT_TEXT, REFINEMENT_ERROR_TEXT};
