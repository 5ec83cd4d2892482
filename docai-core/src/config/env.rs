//! Environment variable interpolation for provider credentials
//!
//! A credential may be stored as `${DOCAI_GEMINI_KEY}` instead of the key
//! itself. References are expanded at call time, never written back to the
//! store. Only variables carrying [`ENV_VAR_PREFIX`] may be referenced, so a
//! config editor cannot forward arbitrary process secrets to a vendor URL.

use super::error::ConfigError;
use super::schema::ProviderSettings;
use super::secrets::SecretString;
use regex::Regex;
use std::env;
use std::sync::LazyLock;

/// Prefix every referenced variable must carry
pub const ENV_VAR_PREFIX: &str = "DOCAI_";

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("valid env var pattern"));

/// Whether a value contains any `${VAR}` reference
pub fn has_env_reference(value: &str) -> bool {
    ENV_VAR_PATTERN.is_match(value)
}

/// Replace every `${VAR}` reference in `content`
///
/// Fails on the first reference outside [`ENV_VAR_PREFIX`] or to an unset variable.
pub fn interpolate_env_vars(content: &str) -> Result<String, ConfigError> {
    let mut result = content.to_string();

    for cap in ENV_VAR_PATTERN.captures_iter(content) {
        let var_name = &cap[1];
        if !var_name.starts_with(ENV_VAR_PREFIX) {
            return Err(ConfigError::EnvVarNotAllowed {
                var: var_name.to_string(),
                prefix: ENV_VAR_PREFIX,
            });
        }
        match env::var(var_name) {
            Ok(value) => result = result.replace(&cap[0], &value),
            Err(_) => {
                return Err(ConfigError::EnvVarNotFound {
                    var: var_name.to_string(),
                })
            }
        }
    }

    Ok(result)
}

/// Settings with the credential's env references expanded
pub fn expand_credential(settings: &ProviderSettings) -> Result<ProviderSettings, ConfigError> {
    let credential = settings.credential.expose_secret();
    if !has_env_reference(credential) {
        return Ok(settings.clone());
    }

    let mut expanded = settings.clone();
    expanded.credential = SecretString::new(interpolate_env_vars(credential)?);
    Ok(expanded)
}
