//! Gemini provider implementation
//!
//! Generate-content style API: the whole prompt travels as a single user
//! content, and JSON mode is requested through the response MIME type.

use crate::config::{ProviderId, ProviderSettings};
use crate::http::{HttpClient, RequestOptions};
use crate::providers::adapter::{OutputMode, ProviderAdapter, RequestPayload, SAMPLING_TEMPERATURE};
use crate::providers::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Public Gemini API root
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used when the settings leave it empty
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-3-flash-preview";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<&'static str>,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
}

/// Gemini adapter
pub struct GeminiAdapter {
    http: HttpClient,
    base_url: String,
}

impl GeminiAdapter {
    /// Create an adapter against the public API
    pub fn new(http: HttpClient) -> Self {
        Self {
            http,
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
        }
    }

    /// Point the adapter at another API root (proxies, tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Prompt text: instruction, then the labelled context block if any
    pub fn build_prompt(payload: &RequestPayload) -> String {
        match payload.context() {
            Some(context) => format!("{}\n\nContext/Content:\n{}", payload.instruction, context),
            None => payload.instruction.clone(),
        }
    }

    fn build_request(payload: &RequestPayload) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(Self::build_prompt(payload)),
                }],
            }],
            generation_config: GenerationConfig {
                temperature: SAMPLING_TEMPERATURE,
                response_mime_type: match payload.output_mode {
                    OutputMode::Json => Some("application/json"),
                    OutputMode::Text => None,
                },
            },
        }
    }

    /// Concatenated text parts of the first candidate, empty if absent
    fn extract_text(response: GenerateContentResponse) -> String {
        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProviderAdapter for GeminiAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Gemini
    }

    async fn call(
        &self,
        settings: &ProviderSettings,
        payload: &RequestPayload,
    ) -> ProviderResult<String> {
        if settings.credential.is_empty() {
            return Err(ProviderError::CredentialMissing {
                provider: ProviderId::Gemini,
            });
        }

        let model = if settings.model.is_empty() {
            DEFAULT_GEMINI_MODEL
        } else {
            settings.model.as_str()
        };
        let url = format!("{}/models/{}:generateContent", self.base_url, model);
        debug!("Gemini generate-content with model {}", model);

        let headers = [(
            "x-goog-api-key",
            settings.credential.expose_secret().to_string(),
        )];
        let json = self
            .http
            .post_json(
                &url,
                &headers,
                &Self::build_request(payload),
                RequestOptions::new("Gemini"),
            )
            .await?;

        let response = serde_json::from_value::<GenerateContentResponse>(json).unwrap_or_default();
        Ok(Self::extract_text(response))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prompt_with_context() {
        let payload = RequestPayload::text("Summarize").with_context("Body text");
        assert_eq!(
            GeminiAdapter::build_prompt(&payload),
            "Summarize\n\nContext/Content:\nBody text"
        );
        assert_eq!(
            GeminiAdapter::build_prompt(&RequestPayload::text("Hi").with_context("")),
            "Hi"
        );
    }

    #[test]
    fn test_request_shape() {
        let body = serde_json::to_value(GeminiAdapter::build_request(&RequestPayload::json("List")))
            .unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"role": "user", "parts": [{"text": "List"}]}],
                "generationConfig": {"temperature": 0.3, "responseMimeType": "application/json"}
            })
        );

        let body = serde_json::to_value(GeminiAdapter::build_request(&RequestPayload::text("Hi")))
            .unwrap();
        assert!(body["generationConfig"].get("responseMimeType").is_none());
    }

    #[test]
    fn test_extract_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "Hello "}, {"text": "there"}]}}]
        }))
        .unwrap();
        assert_eq!(GeminiAdapter::extract_text(response), "Hello there");

        let empty: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {}})).unwrap();
        assert_eq!(GeminiAdapter::extract_text(empty), "");
    }
}
