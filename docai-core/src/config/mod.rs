//! Configuration module
//!
//! Resolves whatever blob the store holds into the current [`AiConfig`]
//! schema, and validates configs before they are written back.

mod env;
mod error;
mod migrate;
mod schema;
mod secrets;
mod store;
mod validator;

pub use env::{expand_credential, interpolate_env_vars, ENV_VAR_PREFIX};
pub use error::{ConfigError, ConfigResult, ValidationError, ValidationErrorKind};
pub use migrate::{normalize_priority, LegacyConfig, RawConfig, RawProviderSettings};
pub use schema::{
    AiConfig, Direction, ProviderId, ProviderSettings, DEFAULT_BAILIAN_BASE_URL,
    DEFAULT_REQUEST_TIMEOUT_SECS,
};
pub use secrets::SecretString;
pub use store::{ConfigStore, FileConfigStore, MemoryConfigStore, AI_CONFIG_KEY};
pub use validator::ConfigValidator;

use serde_json::Value;
use tracing::{debug, warn};

/// Resolve a persisted blob into the current schema
///
/// Total: absent or unusable input yields [`AiConfig::default`].
pub fn resolve(raw: Option<&str>) -> AiConfig {
    let Some(raw) = raw else {
        debug!("No persisted AI config, using defaults");
        return AiConfig::default();
    };

    match serde_json::from_str::<Value>(raw) {
        Ok(value) => resolve_value(&value),
        Err(e) => {
            warn!("Persisted AI config is not valid JSON, using defaults: {}", e);
            AiConfig::default()
        }
    }
}

/// Resolve an already-parsed blob into the current schema
pub fn resolve_value(value: &Value) -> AiConfig {
    if !value.is_object() {
        warn!("Persisted AI config is not a JSON object, using defaults");
        return AiConfig::default();
    }

    match serde_json::from_value::<RawConfig>(value.clone()) {
        Ok(raw) => {
            let legacy = LegacyConfig::detect(raw);
            debug!("Resolving persisted AI config of {} shape", legacy.shape());
            legacy.migrate()
        }
        Err(e) => {
            warn!("Persisted AI config has unexpected field types, using defaults: {}", e);
            AiConfig::default()
        }
    }
}

/// Read and resolve the configuration from a store
pub fn load_config(store: &dyn ConfigStore) -> ConfigResult<AiConfig> {
    let raw = store.get(AI_CONFIG_KEY)?;
    Ok(resolve(raw.as_deref()))
}

/// Validate and persist a configuration, replacing the stored blob
pub fn save_config(store: &dyn ConfigStore, config: &AiConfig) -> ConfigResult<()> {
    ConfigValidator::new().validate(config)?;

    let blob = serde_json::to_string(config).map_err(|e| ConfigError::SerializeError {
        message: e.to_string(),
    })?;
    store.set(AI_CONFIG_KEY, &blob)
}
