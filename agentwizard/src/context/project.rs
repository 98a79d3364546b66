//! Project configuration submitted by the wizard form.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::WizardError;

/// Default project name offered by the form.
pub const DEFAULT_PROJECT_NAME: &str = "My AI SaaS";

/// Default target audience offered by the form.
pub const DEFAULT_TARGET_AUDIENCE: &str = "Small business owners";

const REDACTED: &str = "[REDACTED]";

/// A secret string.
///
/// The value is redacted from `Debug` and `Display` output and is never
/// serialized.
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Credential(String);

impl Credential {
    /// Wraps a secret value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Returns the secret value.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Returns true if the value is empty or whitespace.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("Credential(\"\")")
        } else {
            write!(f, "Credential({REDACTED})")
        }
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(REDACTED)
    }
}

impl From<&str> for Credential {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Credential {
    fn from(value: String) -> Self {
        Self(value)
    }
}

fn default_name() -> String {
    DEFAULT_PROJECT_NAME.to_string()
}

fn default_target_audience() -> String {
    DEFAULT_TARGET_AUDIENCE.to_string()
}

/// The project a run builds.
///
/// Read-only once submitted to a session; discarded on reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectConfig {
    /// Product name shown in the preview.
    #[serde(default = "default_name")]
    pub name: String,
    /// Free-form project idea.
    #[serde(default)]
    pub description: String,
    /// Who the product is for.
    #[serde(default = "default_target_audience")]
    pub target_audience: String,
    /// Authentication provider key.
    #[serde(default, skip_serializing)]
    pub clerk_key: Credential,
    /// Generation model key.
    #[serde(default, skip_serializing)]
    pub gemini_key: Credential,
    /// Documentation scraper key.
    #[serde(default, skip_serializing)]
    pub jina_key: Credential,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            description: String::new(),
            target_audience: default_target_audience(),
            clerk_key: Credential::default(),
            gemini_key: Credential::default(),
            jina_key: Credential::default(),
        }
    }
}

impl ProjectConfig {
    /// Creates a configuration with the form defaults and a description.
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Sets the project name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the target audience.
    #[must_use]
    pub fn with_target_audience(mut self, audience: impl Into<String>) -> Self {
        self.target_audience = audience.into();
        self
    }

    /// Sets the authentication provider key.
    #[must_use]
    pub fn with_clerk_key(mut self, key: impl Into<Credential>) -> Self {
        self.clerk_key = key.into();
        self
    }

    /// Sets the generation model key.
    #[must_use]
    pub fn with_gemini_key(mut self, key: impl Into<Credential>) -> Self {
        self.gemini_key = key.into();
        self
    }

    /// Sets the documentation scraper key.
    #[must_use]
    pub fn with_jina_key(mut self, key: impl Into<Credential>) -> Self {
        self.jina_key = key.into();
        self
    }

    /// Checks the preconditions for starting a run.
    pub fn validate(&self) -> Result<(), WizardError> {
        if self.description.trim().is_empty() {
            return Err(WizardError::EmptyDescription);
        }
        Ok(())
    }

    /// Parses a configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, WizardError> {
        Ok(serde_json::from_str(json)?)
    }
}
