//! Bailian provider implementation
//!
//! Speaks the OpenAI chat-completions protocol, so any compatible endpoint
//! works when `baseURL` is pointed elsewhere.

use crate::config::{ProviderId, ProviderSettings, DEFAULT_BAILIAN_BASE_URL};
use crate::http::{HttpClient, RequestOptions};
use crate::providers::adapter::{OutputMode, ProviderAdapter, RequestPayload, SAMPLING_TEMPERATURE};
use crate::providers::error::{ProviderError, ProviderResult};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Model used when the settings leave it empty
pub const DEFAULT_BAILIAN_MODEL: &str = "qwen-turbo";

const SYSTEM_PROMPT: &str = "You are a helpful assistant.";

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

/// Bailian adapter
pub struct BailianAdapter {
    http: HttpClient,
}

impl BailianAdapter {
    /// Create an adapter sharing the given HTTP client
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    /// `{baseURL}/chat/completions`, falling back to the public endpoint
    pub fn completions_url(settings: &ProviderSettings) -> String {
        let base = settings
            .endpoint
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_BAILIAN_BASE_URL);
        format!("{}/chat/completions", base.trim_end_matches('/'))
    }

    fn build_request<'a>(model: &'a str, payload: &RequestPayload) -> ChatCompletionRequest<'a> {
        let user_content = match payload.context() {
            Some(context) => format!("{}\n\n{}", payload.instruction, context),
            None => payload.instruction.clone(),
        };

        ChatCompletionRequest {
            model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_content,
                },
            ],
            temperature: SAMPLING_TEMPERATURE,
            response_format: match payload.output_mode {
                OutputMode::Json => Some(ResponseFormat {
                    format_type: "json_object",
                }),
                OutputMode::Text => None,
            },
        }
    }

    /// `choices[0].message.content`, empty when the shape is unexpected
    fn extract_text(response: ChatCompletionResponse) -> String {
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message)
            .and_then(|m| m.content)
            .unwrap_or_default()
    }
}

#[async_trait]
impl ProviderAdapter for BailianAdapter {
    fn id(&self) -> ProviderId {
        ProviderId::Bailian
    }

    async fn call(
        &self,
        settings: &ProviderSettings,
        payload: &RequestPayload,
    ) -> ProviderResult<String> {
        if settings.credential.is_empty() {
            return Err(ProviderError::CredentialMissing {
                provider: ProviderId::Bailian,
            });
        }

        let model = if settings.model.is_empty() {
            DEFAULT_BAILIAN_MODEL
        } else {
            settings.model.as_str()
        };
        let url = Self::completions_url(settings);
        debug!("Bailian chat completion with model {}", model);

        let headers = [(
            "Authorization",
            format!("Bearer {}", settings.credential.expose_secret()),
        )];
        let json = self
            .http
            .post_json(
                &url,
                &headers,
                &Self::build_request(model, payload),
                RequestOptions::new("Bailian"),
            )
            .await?;

        let response = serde_json::from_value::<ChatCompletionResponse>(json).unwrap_or_default();
        Ok(Self::extract_text(response))
    }
}
