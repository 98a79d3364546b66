//! Gemini `generateContent` client.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::config::RefineConfig;
use super::generator::{GenerationRequest, TextGenerator};
use crate::context::Credential;
use crate::errors::RefineError;

/// Text generator backed by the Gemini REST API.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: Credential,
    base_url: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("api_key", &self.api_key)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    /// Creates a client with the configured timeout.
    pub fn new(api_key: Credential, config: &RefineConfig) -> Result<Self, RefineError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| RefineError::transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn build_url(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }

    fn headers(&self) -> Result<HeaderMap, RefineError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let key = HeaderValue::from_str(self.api_key.expose())
            .map_err(|_| RefineError::transport("credential is not a valid header value"))?;
        headers.insert("x-goog-api-key", key);
        Ok(headers)
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiSystemInstruction>,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: &'static str,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

impl GeminiRequest {
    fn from_request(request: GenerationRequest) -> Self {
        Self {
            contents: vec![GeminiContent {
                role: "user",
                parts: vec![GeminiPart {
                    text: request.prompt,
                }],
            }],
            system_instruction: (!request.system.is_empty()).then(|| GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: request.system,
                }],
            }),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContentResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiContentResponse {
    #[serde(default)]
    parts: Vec<GeminiPartResponse>,
}

#[derive(Debug, Deserialize)]
struct GeminiPartResponse {
    #[serde(default)]
    text: Option<String>,
}

impl GeminiResponse {
    /// Concatenates the text parts of the first candidate.
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, request: GenerationRequest) -> Result<String, RefineError> {
        let url = self.build_url(&request.model);
        debug!(model = %request.model, "Sending refinement request");

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&GeminiRequest::from_request(request))
            .send()
            .await
            .map_err(|e| RefineError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RefineError::status(status.as_u16(), body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| RefineError::transport(e.to_string()))?;
        let parsed: GeminiResponse =
            serde_json::from_str(&body).map_err(|e| RefineError::Decode(e.to_string()))?;

        Ok(parsed.text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base_url: &str) -> GeminiClient {
        let config = RefineConfig::new().with_base_url(base_url);
        GeminiClient::new(Credential::new("test-key"), &config).unwrap()
    }

    #[test]
    fn test_build_url() {
        let url = client("https://example.test/").build_url("gemini-2.5-flash");
        assert_eq!(
            url,
            "https://example.test/v1beta/models/gemini-2.5-flash:generateContent"
        );
    }

    #[test]
    fn test_key_travels_in_header() {
        let client = client("https://example.test");
        let headers = client.headers().unwrap();

        assert_eq!(headers.get("x-goog-api-key").unwrap(), "test-key");
        assert!(!client.build_url("m").contains("test-key"));
        assert!(!format!("{client:?}").contains("test-key"));
    }

    #[test]
    fn test_request_body_layout() {
        let request = GenerationRequest::refinement("m", "CRM for gyms", "gym owners");
        let body = serde_json::to_value(GeminiRequest::from_request(request)).unwrap();

        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(
            body["contents"][0]["parts"][0]["text"],
            "Project Idea: CRM for gyms\nTarget Audience: gym owners"
        );
        assert!(body["systemInstruction"]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("SaaS Product Manager"));
    }

    #[test]
    fn test_response_concatenates_parts() {
        let parsed: GeminiResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "A CRM "}, {"text": "for gyms."}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text(), "A CRM for gyms.");
    }

    #[test]
    fn test_response_without_candidates_is_empty() {
        let parsed: GeminiResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.text(), "");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_transport_error() {
        let err = client("http://127.0.0.1:9")
            .generate(GenerationRequest::refinement("m", "x", "y"))
            .await
            .unwrap_err();
        assert!(matches!(err, RefineError::Transport(_)));
    }
}
