//! Scripted text generators for testing.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::time::Duration;

use crate::errors::RefineError;
use crate::refine::{GenerationRequest, TextGenerator};

/// A generator that returns fixed text and records each request.
#[derive(Debug)]
pub struct StaticGenerator {
    text: String,
    delay: Duration,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl StaticGenerator {
    /// Creates a generator that answers with `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            delay: Duration::ZERO,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Delays every answer.
    #[must_use]
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Returns the number of requests received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Returns every request received.
    #[must_use]
    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().clone()
    }
}

#[async_trait]
impl TextGenerator for StaticGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<String, RefineError> {
        self.requests.lock().push(request);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(self.text.clone())
    }
}

/// A generator that always fails with the configured error.
#[derive(Debug)]
pub struct FailingGenerator {
    error: RefineError,
    calls: Mutex<usize>,
}

impl FailingGenerator {
    /// Creates a generator that fails with `error`.
    #[must_use]
    pub fn new(error: RefineError) -> Self {
        Self {
            error,
            calls: Mutex::new(0),
        }
    }

    /// Creates a generator that fails as if the service were unreachable.
    #[must_use]
    pub fn unreachable() -> Self {
        Self::new(RefineError::transport("connection refused"))
    }

    /// Returns the number of calls received.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.calls.lock()
    }
}

#[async_trait]
impl TextGenerator for FailingGenerator {
    async fn generate(&self, _request: GenerationRequest) -> Result<String, RefineError> {
        *self.calls.lock() += 1;
        Err(self.error.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_generator_records_requests() {
        let generator = StaticGenerator::new("refined");
        let request = GenerationRequest::refinement("m", "idea", "people");

        assert_eq!(generator.generate(request.clone()).await.unwrap(), "refined");
        assert_eq!(generator.call_count(), 1);
        assert_eq!(generator.requests(), vec![request]);
    }

    #[tokio::test]
    async fn test_failing_generator() {
        let generator = FailingGenerator::unreachable();
        let err = generator
            .generate(GenerationRequest::refinement("m", "idea", "people"))
            .await
            .unwrap_err();

        assert!(err.is_retryable());
        assert_eq!(generator.call_count(), 1);
    }
}
