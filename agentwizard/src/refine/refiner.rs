//! Description refinement with deterministic fallbacks.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::config::RefineConfig;
use super::generator::{GenerationRequest, TextGenerator};
use crate::context::Credential;
use crate::errors::RefineError;
use crate::observability::SpanTimer;

/// Returned when the service cannot be reached or fails.
pub const REFINEMENT_ERROR_TEXT: &str =
    "Error connecting to AI refinement service. Please proceed with original description.";

/// Returned when the service answers without text.
pub const EMPTY_REFINEMENT_TEXT: &str = "Could not generate refinement.";

/// Builds the offline refinement used when no credential is configured.
#[must_use]
pub fn fallback_refinement(description: &str, audience: &str) -> String {
    format!(
        "(Mock Refinement - API Key missing)\n\n\
         A high-performance SaaS platform designed for {audience}. Features include:\n\
         1. Advanced AI-driven analytics dashboard.\n\
         2. Real-time collaboration tools.\n\
         3. Automated reporting workflows.\n\n\
         Based on: {description}"
    )
}

#[derive(Clone)]
enum Backend {
    Offline,
    Remote(Arc<dyn TextGenerator>),
    Unavailable(String),
}

/// Rewrites project descriptions through a text generator.
///
/// [`refine`](Refiner::refine) never fails: every error is recovered into
/// replacement text.
#[derive(Clone)]
pub struct Refiner {
    backend: Backend,
    model: String,
    timeout: Duration,
}

impl std::fmt::Debug for Refiner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let backend = match &self.backend {
            Backend::Offline => "offline",
            Backend::Remote(_) => "remote",
            Backend::Unavailable(_) => "unavailable",
        };
        f.debug_struct("Refiner")
            .field("backend", &backend)
            .field("model", &self.model)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for Refiner {
    fn default() -> Self {
        Self::offline()
    }
}

impl Refiner {
    /// Creates a refiner that always returns the offline fallback.
    #[must_use]
    pub fn offline() -> Self {
        let config = RefineConfig::default();
        let timeout = config.timeout();
        Self {
            backend: Backend::Offline,
            model: config.model,
            timeout,
        }
    }

    /// Creates a refiner over a custom generator.
    #[must_use]
    pub fn with_generator(generator: Arc<dyn TextGenerator>, config: &RefineConfig) -> Self {
        Self {
            backend: Backend::Remote(generator),
            model: config.model.clone(),
            timeout: config.timeout(),
        }
    }

    /// Creates a refiner from configuration.
    ///
    /// Without a credential the refiner stays offline. With one, it talks to
    /// the Gemini service when the `refine-http` feature is enabled.
    #[must_use]
    pub fn from_config(config: &RefineConfig) -> Self {
        let Some(key) = config.credential() else {
            debug!("No refinement credential configured, using offline fallback");
            return Self::offline();
        };
        Self::remote(key, config)
    }

    #[cfg(feature = "refine-http")]
    fn remote(key: &Credential, config: &RefineConfig) -> Self {
        match super::gemini::GeminiClient::new(key.clone(), config) {
            Ok(client) => Self::with_generator(Arc::new(client), config),
            Err(err) => {
                warn!(error = %err, "Refinement client unavailable");
                Self {
                    backend: Backend::Unavailable(err.to_string()),
                    model: config.model.clone(),
                    timeout: config.timeout(),
                }
            }
        }
    }

    #[cfg(not(feature = "refine-http"))]
    fn remote(_key: &Credential, _config: &RefineConfig) -> Self {
        debug!("HTTP refinement disabled, using offline fallback");
        Self::offline()
    }

    /// Returns true if refinement calls a remote generator.
    #[must_use]
    pub fn is_online(&self) -> bool {
        matches!(self.backend, Backend::Remote(_))
    }

    /// Returns the model requested from the generator.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Refines a description for the given audience.
    pub async fn refine(&self, description: &str, audience: &str) -> String {
        let generator = match &self.backend {
            Backend::Offline => return fallback_refinement(description, audience),
            Backend::Unavailable(reason) => {
                warn!(reason = %reason, "Refinement skipped");
                return REFINEMENT_ERROR_TEXT.to_string();
            }
            Backend::Remote(generator) => Arc::clone(generator),
        };

        let timer = SpanTimer::start("refine");
        let request = GenerationRequest::refinement(self.model.clone(), description, audience);
        let result = match tokio::time::timeout(self.timeout, generator.generate(request)).await {
            Ok(result) => result,
            Err(_) => Err(RefineError::Timeout(self.timeout)),
        };

        match result {
            Ok(text) if text.is_empty() => {
                warn!(model = %self.model, "Refinement service returned no text");
                EMPTY_REFINEMENT_TEXT.to_string()
            }
            Ok(text) => {
                info!(model = %self.model, duration_ms = timer.finish(), "Description refined");
                text
            }
            Err(err) => {
                warn!(
                    error = %err,
                    details = %serde_json::Value::Object(err.to_dict().into_iter().collect()),
                    retryable = err.is_retryable(),
                    duration_ms = timer.finish(),
                    "Refinement failed"
                );
                REFINEMENT_ERROR_TEXT.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::generator::MockTextGenerator;
    use super::*;
    use mockall::predicate::always;
    use pretty_assertions::assert_eq;

    fn remote(mock: MockTextGenerator) -> Refiner {
        Refiner::with_generator(Arc::new(mock), &RefineConfig::default())
    }

    #[tokio::test]
    async fn test_offline_fallback_is_deterministic() {
        let refiner = Refiner::offline();

        let a = refiner.refine("Track expenses for freelancers", "freelancers").await;
        let b = refiner.refine("Track expenses for freelancers", "freelancers").await;

        assert_eq!(a, b);
        assert!(a.starts_with("(Mock Refinement - API Key missing)\n\n"));
        assert!(a.contains("designed for freelancers. Features include:"));
        assert!(a.ends_with("Based on: Track expenses for freelancers"));
    }

    #[test]
    fn test_fallback_layout() {
        assert_eq!(
            fallback_refinement("d", "a"),
            "(Mock Refinement - API Key missing)\n\n\
             A high-performance SaaS platform designed for a. Features include:\n\
             1. Advanced AI-driven analytics dashboard.\n\
             2. Real-time collaboration tools.\n\
             3. Automated reporting workflows.\n\n\
             Based on: d"
        );
    }

    #[test]
    fn test_from_config_without_key_is_offline() {
        assert!(!Refiner::from_config(&RefineConfig::default()).is_online());
        assert!(!Refiner::from_config(&RefineConfig::new().with_api_key("")).is_online());
    }

    #[tokio::test]
    async fn test_remote_text_is_returned_verbatim() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .withf(|request| {
                request.model == "gemini-2.5-flash"
                    && request.prompt == "Project Idea: CRM for gyms\nTarget Audience: gym owners"
            })
            .times(1)
            .returning(|_| Ok("  A CRM for gym owners.  ".to_string()));

        let refined = remote(mock).refine("CRM for gyms", "gym owners").await;
        assert_eq!(refined, "  A CRM for gym owners.  ");
    }

    #[tokio::test]
    async fn test_empty_response_text() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .with(always())
            .returning(|_| Ok(String::new()));

        assert_eq!(remote(mock).refine("x", "y").await, EMPTY_REFINEMENT_TEXT);
    }

    #[tokio::test]
    async fn test_whitespace_response_is_not_empty() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate().returning(|_| Ok("\n".to_string()));

        assert_eq!(remote(mock).refine("x", "y").await, "\n");
    }

    #[test]
    fn test_offline_uses_default_settings() {
        let refiner = Refiner::offline();

        assert!(!refiner.is_online());
        assert_eq!(refiner.model(), "gemini-2.5-flash");
        assert_eq!(refiner.timeout, Duration::from_secs(30));
    }

    #[tokio::test]
    async fn test_transport_failure_is_recovered() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .returning(|_| Err(RefineError::transport("connection refused")));

        let description = String::from("CRM for gyms");
        let refined = remote(mock).refine(&description, "gym owners").await;

        assert_eq!(refined, REFINEMENT_ERROR_TEXT);
        assert_eq!(description, "CRM for gyms");
    }

    #[tokio::test]
    async fn test_status_failure_is_recovered() {
        let mut mock = MockTextGenerator::new();
        mock.expect_generate()
            .returning(|_| Err(RefineError::status(503, "overloaded")));

        assert_eq!(remote(mock).refine("x", "y").await, REFINEMENT_ERROR_TEXT);
    }

    #[tokio::test]
    async fn test_unavailable_backend_returns_error_text() {
        let refiner = Refiner {
            backend: Backend::Unavailable("tls init failed".to_string()),
            ..Refiner::offline()
        };
        assert_eq!(refiner.refine("x", "y").await, REFINEMENT_ERROR_TEXT);
    }
}
