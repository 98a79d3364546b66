//! # Agentwizard
//!
//! The engine behind a project-generation wizard that simulates a multi-agent
//! build. At its core is a scripted async pipeline runner: a fixed timeline of
//! timed agent stages is replayed with real pacing, each visited stage appends
//! one log line, and the coarse build phase is derived as playback advances.
//!
//! The crate provides:
//!
//! - **Timelines**: immutable, cloneable stage tables, loadable from JSON
//! - **Sequencing**: an explicit playback state machine with cancellation at
//!   every suspension point
//! - **Phase derivation**: a lookup table plus a sticky, never-regress rule
//! - **Sessions**: the `Idle → Running → Complete` lifecycle with reset,
//!   snapshots and `watch` subscriptions
//! - **Refinement**: an optional AI rewrite of the project description that
//!   never fails
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use agentwizard::prelude::*;
//!
//! # async fn demo() -> Result<(), WizardError> {
//! let session = WizardSession::new(&WizardConfig::default());
//!
//! let handle = session.start(
//!     ProjectConfig::new("CRM for gyms")
//!         .with_name("Acme")
//!         .with_target_audience("gym owners"),
//! )?;
//!
//! let outcome = handle.wait().await;
//! assert!(outcome.is_completed());
//! assert_eq!(session.preview()?.product_name, "Acme");
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod cancellation;
pub mod config;
pub mod context;
pub mod core;
pub mod errors;
pub mod events;
pub mod observability;
pub mod pipeline;
pub mod preview;
pub mod refine;
pub mod session;
pub mod testing;
pub mod timeline;
pub mod utils;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::cancellation::CancellationToken;
    pub use crate::config::WizardConfig;
    pub use crate::context::{Credential, ProjectConfig};
    pub use crate::core::{AgentCategory, LogEntry, LogStatus, StageOutcome};
    pub use crate::errors::{RefineError, WizardError};
    pub use crate::events::{
        ChannelEventSink, CollectingEventSink, EventSink, LogSink, LoggingEventSink,
        NoOpEventSink, RunEvent,
    };
    pub use crate::observability::{init_tracing, TracingConfig};
    pub use crate::pipeline::{Phase, PhaseMap, PhaseTracker, Progress, RunOutcome, Sequencer, Step};
    pub use crate::preview::{DashboardPreview, PhaseSteps, TerminalLine};
    pub use crate::refine::{RefineConfig, Refiner, TextGenerator};
    pub use crate::session::{RunHandle, RunState, SessionSnapshot, WizardSession, WizardStep};
    pub use crate::timeline::{reference_build, StageDescriptor, Timeline};
    pub use crate::utils::{generate_uuid, Timestamp};
}
