//! Project context submitted to a session.

mod project;

pub use project::{Credential, ProjectConfig, DEFAULT_PROJECT_NAME, DEFAULT_TARGET_AUDIENCE};
