//! Tracing subscriber setup and span timing.

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tracing_subscriber::EnvFilter;

use crate::errors::WizardError;

/// Configuration for the tracing subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TracingConfig {
    /// Default filter directive; `RUST_LOG` overrides it.
    #[serde(default = "default_filter")]
    pub filter: String,
    /// Emit JSON lines instead of compact text.
    #[serde(default)]
    pub json: bool,
    /// Include the event target.
    #[serde(default = "default_with_target")]
    pub with_target: bool,
}

fn default_filter() -> String {
    "agentwizard=info".to_string()
}

fn default_with_target() -> bool {
    true
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            json: false,
            with_target: default_with_target(),
        }
    }
}

impl TracingConfig {
    /// Sets the default filter directive.
    #[must_use]
    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    /// Enables or disables JSON output.
    #[must_use]
    pub fn with_json(mut self, json: bool) -> Self {
        self.json = json;
        self
    }

    /// Builds the env filter, preferring `RUST_LOG` when set.
    pub fn env_filter(&self) -> Result<EnvFilter, WizardError> {
        match EnvFilter::try_from_default_env() {
            Ok(filter) => Ok(filter),
            Err(_) => EnvFilter::try_new(&self.filter)
                .map_err(|e| WizardError::Config(format!("invalid filter '{}': {e}", self.filter))),
        }
    }
}

/// Installs the global tracing subscriber.
///
/// A subscriber that is already installed is left in place.
pub fn init_tracing(config: &TracingConfig) -> Result<(), WizardError> {
    let filter = config.env_filter()?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let installed = if config.json {
        builder.json().try_init().is_ok()
    } else {
        builder.compact().try_init().is_ok()
    };

    if installed {
        tracing::debug!(filter = %config.filter, json = config.json, "Tracing initialized");
    }
    Ok(())
}

/// Simple span timing helper.
///
/// Measured on the tokio clock, so paused-time tests see virtual durations.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: String,
}

impl SpanTimer {
    /// Starts a new span timer.
    #[must_use]
    pub fn start(name: impl Into<String>) -> Self {
        Self {
            start: Instant::now(),
            name: name.into(),
        }
    }

    /// Returns the elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// Returns the span name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Finishes the span and returns the duration.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_tracing_config_defaults() {
        let config = TracingConfig::default();
        assert_eq!(config.filter, "agentwizard=info");
        assert!(!config.json);
        assert!(config.with_target);
    }

    #[test]
    fn test_invalid_filter_is_config_error() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let err = TracingConfig::default()
            .with_filter("agentwizard=loud")
            .env_filter()
            .unwrap_err();
        assert!(matches!(err, WizardError::Config(_)));
    }

    #[test]
    fn test_init_twice_is_harmless() {
        let config = TracingConfig::default().with_json(true);
        assert!(init_tracing(&config).is_ok());
        assert!(init_tracing(&config).is_ok());
    }

    #[tokio::test(start_paused = true)]
    async fn test_span_timer_follows_tokio_clock() {
        let timer = SpanTimer::start("run");
        tokio::time::sleep(Duration::from_millis(1500)).await;

        assert_eq!(timer.name(), "run");
        assert!((timer.finish() - 1500.0).abs() < 1.0);
    }
}
