//! Configuration schema structures with serde support
//!
//! The serialized field names match the blob the portal has always persisted
//! (`apiKey`, `baseURL`, one object per provider), so a config saved by this
//! crate can be read back by older tooling and vice versa.

use super::secrets::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default base URL for the Bailian OpenAI-compatible endpoint
pub const DEFAULT_BAILIAN_BASE_URL: &str = "https://dashscope.aliyuncs.com/compatible-mode/v1";

/// Default per-provider call timeout
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Known AI providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderId {
    /// Google Gemini, generate-content style
    Gemini,
    /// Alibaba Bailian, OpenAI chat-completions compatible
    Bailian,
}

impl ProviderId {
    /// Every known provider, in default priority order
    pub const ALL: [ProviderId; 2] = [ProviderId::Gemini, ProviderId::Bailian];

    /// Wire/persisted name of the provider
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderId::Gemini => "gemini",
            ProviderId::Bailian => "bailian",
        }
    }

    /// Parse a persisted provider name; unknown names yield `None`
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "gemini" => Some(ProviderId::Gemini),
            "bailian" => Some(ProviderId::Bailian),
            _ => None,
        }
    }

    /// The priority order that puts `self` first
    pub fn priority_first(self) -> Vec<ProviderId> {
        let mut priority = vec![self];
        priority.extend(Self::ALL.iter().copied().filter(|id| *id != self));
        priority
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Settings for a single provider
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProviderSettings {
    /// Individual toggle
    pub enabled: bool,

    /// API key, or a `${ENV_VAR}` reference
    #[serde(rename = "apiKey")]
    pub credential: SecretString,

    /// Model name; empty means the adapter default
    pub model: String,

    /// Base URL, only meaningful for REST-style adapters
    #[serde(rename = "baseURL", default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ProviderSettings {
    /// Enabled settings with no credential configured yet
    pub fn unconfigured() -> Self {
        Self {
            enabled: true,
            credential: SecretString::default(),
            model: String::new(),
            endpoint: None,
        }
    }

    /// Builder-style credential setter
    pub fn with_credential(mut self, credential: impl Into<SecretString>) -> Self {
        self.credential = credential.into();
        self
    }

    /// Builder-style model setter
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Builder-style endpoint setter
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Builder-style enable toggle
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
}

/// Root AI configuration, persisted as a single blob
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AiConfig {
    /// Global kill switch
    pub enabled: bool,

    /// Fallback order
    pub priority: Vec<ProviderId>,

    /// Gemini settings
    pub gemini: ProviderSettings,

    /// Bailian settings
    pub bailian: ProviderSettings,

    /// Per-provider call timeout in seconds, 0 disables it
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// Direction for reordering the priority chain
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            priority: ProviderId::ALL.to_vec(),
            gemini: ProviderSettings::unconfigured(),
            bailian: ProviderSettings::unconfigured().with_endpoint(DEFAULT_BAILIAN_BASE_URL),
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
        }
    }
}

fn default_request_timeout() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

impl AiConfig {
    /// Settings for a provider
    pub fn provider(&self, id: ProviderId) -> &ProviderSettings {
        match id {
            ProviderId::Gemini => &self.gemini,
            ProviderId::Bailian => &self.bailian,
        }
    }

    /// Mutable settings for a provider
    pub fn provider_mut(&mut self, id: ProviderId) -> &mut ProviderSettings {
        match id {
            ProviderId::Gemini => &mut self.gemini,
            ProviderId::Bailian => &mut self.bailian,
        }
    }

    /// Flip a provider's individual toggle
    pub fn toggle_provider(&mut self, id: ProviderId) {
        let settings = self.provider_mut(id);
        settings.enabled = !settings.enabled;
    }

    /// Swap the entry at `index` with its neighbour; out-of-range moves are no-ops
    pub fn move_priority(&mut self, index: usize, direction: Direction) {
        let len = self.priority.len();
        match direction {
            Direction::Up if index > 0 && index < len => self.priority.swap(index, index - 1),
            Direction::Down if index + 1 < len => self.priority.swap(index, index + 1),
            _ => {}
        }
    }

    /// Providers that would actually be attempted, in order
    pub fn active_providers(&self) -> Vec<ProviderId> {
        self.priority
            .iter()
            .copied()
            .filter(|id| self.provider(*id).enabled)
            .collect()
    }
}
