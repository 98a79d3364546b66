//! Text generation boundary.

use async_trait::async_trait;

use crate::errors::RefineError;

/// System framing sent with every refinement request.
pub const REFINEMENT_SYSTEM_PROMPT: &str = "You are an expert SaaS Product Manager. \
Refine the user's project idea into a professional technical description for an \
automated code generator. Keep it concise (under 100 words) and technically specific. \
Highlight the core features and the tech stack implications.";

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    /// Model name.
    pub model: String,
    /// System instruction.
    pub system: String,
    /// User turn.
    pub prompt: String,
}

impl GenerationRequest {
    /// Builds the refinement request for a project idea.
    #[must_use]
    pub fn refinement(model: impl Into<String>, description: &str, audience: &str) -> Self {
        Self {
            model: model.into(),
            system: REFINEMENT_SYSTEM_PROMPT.to_string(),
            prompt: format!("Project Idea: {description}\nTarget Audience: {audience}"),
        }
    }
}

/// A backend that turns a request into text.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates text for the request.
    ///
    /// An empty string means the service answered without content.
    async fn generate(&self, request: GenerationRequest) -> Result<String, RefineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refinement_request_layout() {
        let request = GenerationRequest::refinement("gemini-2.5-flash", "CRM for gyms", "gym owners");

        assert_eq!(request.model, "gemini-2.5-flash");
        assert_eq!(request.prompt, "Project Idea: CRM for gyms\nTarget Audience: gym owners");
        assert!(request.system.contains("under 100 words"));
    }
}
