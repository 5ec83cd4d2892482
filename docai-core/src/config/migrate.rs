//! Migration of persisted configuration blobs into the current schema
//!
//! Three shapes have been persisted over time. They are told apart by which
//! fields are present, checked from the oldest shape to the current one:
//!
//! 1. `Flat`: a single `apiKey`/`provider`/`model` triple, no per-provider objects.
//! 2. `Unprioritized`: per-provider objects but no `priority` list and no
//!    per-provider `enabled` toggles.
//! 3. `Current`: everything present.
//!
//! Migration is one-directional; nothing here ever writes an older shape.

use super::schema::{AiConfig, ProviderId, ProviderSettings, DEFAULT_BAILIAN_BASE_URL};
use super::secrets::SecretString;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::warn;

/// Read a field, treating a value of the wrong type as absent
///
/// One bad field must not discard the rest of the blob (credentials included).
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(parsed) => Ok(Some(parsed)),
        Err(e) => {
            warn!("Ignoring persisted AI config field of unexpected type: {}", e);
            Ok(None)
        }
    }
}

/// Per-provider settings as found in a persisted blob, every field optional
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProviderSettings {
    #[serde(default, deserialize_with = "lenient")]
    pub enabled: Option<bool>,
    #[serde(rename = "apiKey", default, deserialize_with = "lenient")]
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(rename = "baseURL", default, deserialize_with = "lenient")]
    pub base_url: Option<String>,
}

/// A persisted blob of any historical shape
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfig {
    #[serde(default, deserialize_with = "lenient")]
    pub enabled: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub priority: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub gemini: Option<RawProviderSettings>,
    #[serde(default, deserialize_with = "lenient")]
    pub bailian: Option<RawProviderSettings>,
    #[serde(rename = "requestTimeoutSecs", default, deserialize_with = "lenient")]
    pub request_timeout_secs: Option<u64>,

    // Fields of the flat and unprioritized shapes
    #[serde(default, deserialize_with = "lenient")]
    pub provider: Option<String>,
    #[serde(rename = "apiKey", default, deserialize_with = "lenient")]
    pub api_key: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub model: Option<String>,
    #[serde(rename = "baseURL", default, deserialize_with = "lenient")]
    pub base_url: Option<String>,
}

/// A persisted blob classified by shape
#[derive(Debug, Clone)]
pub enum LegacyConfig {
    /// Single flat credential for one named provider
    Flat(RawConfig),
    /// Per-provider objects without a priority list
    Unprioritized(RawConfig),
    /// Current shape
    Current(RawConfig),
}

impl LegacyConfig {
    /// Classify a blob; the first matching rule wins
    pub fn detect(raw: RawConfig) -> Self {
        if raw.api_key.is_some() && raw.gemini.is_none() && raw.bailian.is_none() {
            LegacyConfig::Flat(raw)
        } else if raw.priority.is_none() {
            LegacyConfig::Unprioritized(raw)
        } else {
            LegacyConfig::Current(raw)
        }
    }

    /// Name of the detected shape, for logging
    pub fn shape(&self) -> &'static str {
        match self {
            LegacyConfig::Flat(_) => "flat",
            LegacyConfig::Unprioritized(_) => "unprioritized",
            LegacyConfig::Current(_) => "current",
        }
    }

    /// Convert into the current schema
    pub fn migrate(self) -> AiConfig {
        match self {
            LegacyConfig::Flat(raw) => migrate_flat(raw),
            LegacyConfig::Unprioritized(raw) => migrate_unprioritized(raw),
            LegacyConfig::Current(raw) => merge_current(raw),
        }
    }
}

/// The provider a legacy blob named as its single provider
fn named_provider(raw: &RawConfig) -> ProviderId {
    match raw.provider.as_deref() {
        Some("bailian") => ProviderId::Bailian,
        _ => ProviderId::Gemini,
    }
}

fn migrate_flat(raw: RawConfig) -> AiConfig {
    let named = named_provider(&raw);
    let defaults = AiConfig::default();

    let credential = raw.api_key.unwrap_or_default();
    let model = raw.model.unwrap_or_default();
    let endpoint = raw
        .base_url
        .filter(|url| !url.is_empty())
        .unwrap_or_else(|| DEFAULT_BAILIAN_BASE_URL.to_string());

    let settings_for = |id: ProviderId| {
        let base = ProviderSettings::unconfigured();
        if id == named {
            base.with_credential(credential.as_str()).with_model(model.as_str())
        } else {
            base
        }
    };

    AiConfig {
        // The flat shape predates the "enabled by default" policy
        enabled: raw.enabled.unwrap_or(false),
        priority: named.priority_first(),
        gemini: settings_for(ProviderId::Gemini),
        bailian: settings_for(ProviderId::Bailian).with_endpoint(endpoint),
        request_timeout_secs: defaults.request_timeout_secs,
    }
}

fn migrate_unprioritized(raw: RawConfig) -> AiConfig {
    let defaults = AiConfig::default();
    let priority = named_provider(&raw).priority_first();

    AiConfig {
        enabled: raw.enabled.unwrap_or(defaults.enabled),
        priority,
        gemini: merge_settings(defaults.gemini, raw.gemini).with_enabled(true),
        bailian: merge_settings(defaults.bailian, raw.bailian).with_enabled(true),
        request_timeout_secs: raw
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs),
    }
}

fn merge_current(raw: RawConfig) -> AiConfig {
    let defaults = AiConfig::default();
    let priority = raw
        .priority
        .as_deref()
        .map(normalize_priority)
        .unwrap_or(defaults.priority);

    AiConfig {
        enabled: raw.enabled.unwrap_or(defaults.enabled),
        priority,
        gemini: merge_settings(defaults.gemini, raw.gemini),
        bailian: merge_settings(defaults.bailian, raw.bailian),
        request_timeout_secs: raw
            .request_timeout_secs
            .unwrap_or(defaults.request_timeout_secs),
    }
}

/// Overlay the fields a blob actually carries onto default settings
fn merge_settings(base: ProviderSettings, raw: Option<RawProviderSettings>) -> ProviderSettings {
    let Some(raw) = raw else {
        return base;
    };

    ProviderSettings {
        enabled: raw.enabled.unwrap_or(base.enabled),
        credential: raw.api_key.map(SecretString::new).unwrap_or(base.credential),
        model: raw.model.unwrap_or(base.model),
        endpoint: raw.base_url.or(base.endpoint),
    }
}

/// Keep known ids only, first occurrence wins
pub fn normalize_priority(entries: &[Value]) -> Vec<ProviderId> {
    let mut priority = Vec::with_capacity(ProviderId::ALL.len());
    for id in entries
        .iter()
        .filter_map(Value::as_str)
        .filter_map(ProviderId::parse)
    {
        if !priority.contains(&id) {
            priority.push(id);
        }
    }
    priority
}
