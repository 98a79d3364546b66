//! Configuration for description refinement.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::context::Credential;

/// Environment variables consulted for the refinement credential, in order.
pub const CREDENTIAL_ENV_VARS: [&str; 2] = ["API_KEY", "GEMINI_API_KEY"];

/// Configuration for the refinement collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineConfig {
    /// Service credential; without one the refiner stays offline.
    #[serde(default, skip_serializing)]
    pub api_key: Option<Credential>,
    /// Generation model name.
    #[serde(default = "default_model")]
    pub model: String,
    /// Service base URL.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: f64,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_base_url() -> String {
    "https://generativelanguage.googleapis.com".to_string()
}

fn default_timeout() -> f64 {
    30.0
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
        }
    }
}

impl RefineConfig {
    /// Creates a new refinement configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the credential.
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<Credential>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Sets the model.
    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Sets the timeout.
    #[must_use]
    pub fn with_timeout(mut self, seconds: f64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    /// Fills a missing credential from the environment.
    ///
    /// `API_KEY` takes precedence over `GEMINI_API_KEY`. An explicitly
    /// configured credential is kept.
    #[must_use]
    pub fn with_env_credentials(self) -> Self {
        self.with_credentials_from(|name| std::env::var(name).ok())
    }

    /// Fills a missing credential by looking up [`CREDENTIAL_ENV_VARS`] in order.
    ///
    /// Blank values are skipped.
    #[must_use]
    pub fn with_credentials_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if self.credential().is_none() {
            self.api_key = CREDENTIAL_ENV_VARS
                .iter()
                .filter_map(|&name| lookup(name))
                .map(Credential::from)
                .find(|key| !key.is_blank());
        }
        self
    }

    /// Returns the credential if one is configured and non-blank.
    #[must_use]
    pub fn credential(&self) -> Option<&Credential> {
        self.api_key.as_ref().filter(|key| !key.is_blank())
    }

    /// Gets timeout as Duration.
    ///
    /// Negative or non-finite values fall back to the default.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::try_from_secs_f64(self.timeout_seconds)
            .unwrap_or_else(|_| Duration::from_secs_f64(default_timeout()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refine_config_defaults() {
        let config = RefineConfig::default();

        assert_eq!(config.model, "gemini-2.5-flash");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_blank_credential_is_absent() {
        let config = RefineConfig::new().with_api_key("   ");
        assert!(config.credential().is_none());
    }

    #[test]
    fn test_explicit_credential_survives_env_lookup() {
        let config = RefineConfig::new()
            .with_api_key("explicit")
            .with_env_credentials();
        assert_eq!(config.credential().unwrap().expose(), "explicit");
    }

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(key, _)| *key == name)
                .map(|(_, value)| (*value).to_string())
        }
    }

    #[test]
    fn test_api_key_takes_precedence() {
        let config = RefineConfig::new().with_credentials_from(lookup(&[
            ("GEMINI_API_KEY", "gemini"),
            ("API_KEY", "primary"),
        ]));
        assert_eq!(config.credential().unwrap().expose(), "primary");
    }

    #[test]
    fn test_gemini_key_is_fallback() {
        let config =
            RefineConfig::new().with_credentials_from(lookup(&[("GEMINI_API_KEY", "gemini")]));
        assert_eq!(config.credential().unwrap().expose(), "gemini");
    }

    #[test]
    fn test_blank_api_key_is_skipped() {
        let config = RefineConfig::new().with_credentials_from(lookup(&[
            ("API_KEY", "  "),
            ("GEMINI_API_KEY", "gemini"),
        ]));
        assert_eq!(config.credential().unwrap().expose(), "gemini");
    }

    #[test]
    fn test_no_credentials_found() {
        let config = RefineConfig::new().with_credentials_from(|_| None);
        assert!(config.credential().is_none());
        assert!(config.api_key.is_none());
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let config = RefineConfig::new().with_timeout(-1.0);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_credential_not_serialized() {
        let config = RefineConfig::new().with_api_key("secret").with_model("m");
        let json = serde_json::to_string(&config).unwrap();

        assert!(!json.contains("secret"));
        assert!(json.contains("\"model\":\"m\""));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: RefineConfig =
            serde_json::from_str(r#"{"api_key": "k", "timeout_seconds": 5}"#).unwrap();

        assert_eq!(config.credential().unwrap().expose(), "k");
        assert_eq!(config.timeout(), Duration::from_secs(5));
        assert_eq!(config.model, "gemini-2.5-flash");
    }
}
