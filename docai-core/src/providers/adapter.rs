//! Provider adapter trait and the generic request payload
//!
//! Every vendor receives the same three-field payload and answers with plain
//! text, so the router never branches on vendor beyond picking the adapter.

use crate::config::{ProviderId, ProviderSettings};
use crate::providers::error::ProviderResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sampling temperature sent to every vendor; low for repeatable answers
pub const SAMPLING_TEMPERATURE: f64 = 0.3;

/// How the vendor should shape its answer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Free text
    #[default]
    Text,
    /// Ask the vendor's native JSON mode, if any
    Json,
}

/// One task invocation's request, built fresh per call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestPayload {
    pub instruction: String,
    pub context: Option<String>,
    pub output_mode: OutputMode,
}

impl RequestPayload {
    /// Text-mode payload with no context
    pub fn text(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            context: None,
            output_mode: OutputMode::Text,
        }
    }

    /// JSON-mode payload with no context
    pub fn json(instruction: impl Into<String>) -> Self {
        Self {
            output_mode: OutputMode::Json,
            ..Self::text(instruction)
        }
    }

    /// Attach context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    /// Context, treating an empty string as absent
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref().filter(|c| !c.is_empty())
    }
}

/// Core adapter trait every AI vendor integration implements
#[async_trait]
pub trait ProviderAdapter: Send + Sync {
    /// Which provider this adapter serves
    fn id(&self) -> ProviderId;

    /// Perform one call. An empty string is a successful (if unhelpful) answer.
    async fn call(&self, settings: &ProviderSettings, payload: &RequestPayload)
        -> ProviderResult<String>;
}
