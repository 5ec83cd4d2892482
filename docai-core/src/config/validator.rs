//! Configuration validation applied before a config is persisted
//!
//! Resolution never fails, so anything read back from the store is usable.
//! Validation only guards the write path used by the admin surface.

use super::error::{ValidationError, ValidationErrorKind};
use super::schema::{AiConfig, ProviderId};
use std::collections::HashSet;

/// Configuration validator
#[derive(Debug, Default)]
pub struct ConfigValidator;

impl ConfigValidator {
    /// Create a new validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a configuration
    pub fn validate(&self, config: &AiConfig) -> Result<(), ValidationError> {
        self.validate_priority(config)?;
        for id in ProviderId::ALL {
            self.validate_endpoint(id, config.provider(id).endpoint.as_deref())?;
        }
        Ok(())
    }

    fn validate_priority(&self, config: &AiConfig) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for (i, id) in config.priority.iter().enumerate() {
            if !seen.insert(id) {
                return Err(ValidationError::new(
                    format!("priority[{}]", i),
                    ValidationErrorKind::DuplicateValue {
                        value: id.to_string(),
                    },
                ));
            }
        }
        Ok(())
    }

    fn validate_endpoint(&self, id: ProviderId, endpoint: Option<&str>) -> Result<(), ValidationError> {
        // Empty means "use the adapter default"
        let Some(endpoint) = endpoint.filter(|e| !e.is_empty()) else {
            return Ok(());
        };
        let path = format!("{}.baseURL", id);

        match url::Url::parse(endpoint) {
            Ok(url) if url.scheme() == "http" || url.scheme() == "https" => Ok(()),
            Ok(url) => Err(ValidationError::invalid_url(
                path,
                format!("URL scheme must be http or https, got: {}", url.scheme()),
            )),
            Err(e) => Err(ValidationError::invalid_url(path, e.to_string())
                .with_context("base URL must be an absolute http(s) URL")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(ConfigValidator::new().validate(&AiConfig::default()).is_ok());
    }

    #[test]
    fn test_duplicate_priority_rejected() {
        let mut config = AiConfig::default();
        config.priority = vec![ProviderId::Bailian, ProviderId::Bailian];

        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "priority[1]");
        assert!(matches!(err.kind, ValidationErrorKind::DuplicateValue { .. }));
    }

    #[test]
    fn test_bad_endpoint_rejected() {
        let mut config = AiConfig::default();
        config.bailian.endpoint = Some("ftp://example.com/v1".to_string());
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert_eq!(err.field_path, "bailian.baseURL");

        config.bailian.endpoint = Some("not a url".to_string());
        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(err.to_string().contains("bailian.baseURL"));
    }

    #[test]
    fn test_empty_endpoint_allowed() {
        let mut config = AiConfig::default();
        config.bailian.endpoint = Some(String::new());
        assert!(ConfigValidator::new().validate(&config).is_ok());
    }
}
