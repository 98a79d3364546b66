//! Error types for the agentwizard engine.
//!
//! The taxonomy is deliberately narrow: stage playback performs no I/O and has
//! no error path, precondition violations are surfaced as [`WizardError`], and
//! refinement failures ([`RefineError`]) never leave the refinement boundary.

use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

/// The main error type for wizard operations.
#[derive(Debug, Error)]
pub enum WizardError {
    /// A run was requested for a project without a description.
    #[error("Project description must not be empty")]
    EmptyDescription,

    /// A run was requested while another run is still playing back.
    #[error("A run is already in progress")]
    AlreadyRunning,

    /// The completed project configuration was read before a run produced one.
    #[error("No completed project configuration is available")]
    NoConfig,

    /// Invalid configuration or subscriber setup.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for WizardError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

impl WizardError {
    /// Returns true if the error is a caller precondition violation.
    ///
    /// A caller that disables its triggers until the preconditions hold never
    /// observes these.
    #[must_use]
    pub const fn is_precondition(&self) -> bool {
        matches!(
            self,
            Self::EmptyDescription | Self::AlreadyRunning | Self::NoConfig
        )
    }
}

/// Errors raised by a text generation backend.
///
/// The refiner recovers every variant into replacement text; these only
/// surface in logs and in direct calls to a generator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RefineError {
    /// The request could not be delivered.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("Refinement service returned status {status}: {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Response body, possibly empty.
        body: String,
    },

    /// The response body could not be decoded.
    #[error("Could not decode refinement response: {0}")]
    Decode(String),

    /// The call exceeded its time budget.
    #[error("Refinement timed out after {0:?}")]
    Timeout(Duration),
}

impl RefineError {
    /// Creates a transport error.
    #[must_use]
    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport(reason.into())
    }

    /// Creates a status error.
    #[must_use]
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    /// Whether retrying the identical call could plausibly succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) | Self::Timeout(_) => true,
            Self::Status { status, .. } => *status == 429 || *status >= 500,
            Self::Decode(_) => false,
        }
    }

    /// Converts to a dictionary representation for structured logs.
    #[must_use]
    pub fn to_dict(&self) -> HashMap<String, serde_json::Value> {
        let mut map = HashMap::new();

        match self {
            Self::Transport(reason) => {
                map.insert("type".to_string(), serde_json::json!("transport"));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::Status { status, body } => {
                map.insert("type".to_string(), serde_json::json!("status"));
                map.insert("status".to_string(), serde_json::json!(status));
                map.insert("body".to_string(), serde_json::json!(body));
            }
            Self::Decode(reason) => {
                map.insert("type".to_string(), serde_json::json!("decode"));
                map.insert("reason".to_string(), serde_json::json!(reason));
            }
            Self::Timeout(after) => {
                map.insert("type".to_string(), serde_json::json!("timeout"));
                let timeout_ms = u64::try_from(after.as_millis()).unwrap_or(u64::MAX);
                map.insert("timeout_ms".to_string(), serde_json::json!(timeout_ms));
            }
        }

        map.insert("message".to_string(), serde_json::json!(self.to_string()));
        map.insert("retryable".to_string(), serde_json::json!(self.is_retryable()));
        map
    }
}
