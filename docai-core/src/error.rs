//! Errors surfaced to callers of AI tasks

use crate::config::{ConfigError, ProviderId};
use crate::providers::ProviderError;
use serde::Serialize;
use thiserror::Error;

/// One provider's failure inside a fallback run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderFailure {
    /// Which provider was attempted
    pub provider: ProviderId,
    /// Why it failed
    #[serde(serialize_with = "serialize_error")]
    pub error: ProviderError,
}

fn serialize_error<S: serde::Serializer>(error: &ProviderError, s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&error.to_string())
}

impl ProviderFailure {
    /// Human-readable failure message
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

/// Errors an AI task can end with
#[derive(Debug, Error)]
pub enum AiError {
    /// The global kill switch is off; no provider was attempted
    #[error("AI features are disabled globally.")]
    Disabled,

    /// Every attempted provider failed (possibly none were attempted)
    #[error("All enabled AI providers failed. Details: {}", join_failures(.failures))]
    AllProvidersFailed { failures: Vec<ProviderFailure> },

    /// A provider answered but the answer did not parse as the expected JSON
    #[error("AI response was not valid JSON: {message}")]
    MalformedStructuredOutput { message: String, raw: String },

    /// The configuration store could not be read or written
    #[error(transparent)]
    Config(#[from] ConfigError),
}

fn join_failures(failures: &[ProviderFailure]) -> String {
    failures
        .iter()
        .map(|f| format!("{}: {}", f.provider, f.error))
        .collect::<Vec<_>>()
        .join("; ")
}

impl AiError {
    /// Whether any provider failed only because it has no credential
    ///
    /// The admin UI uses this to prompt for configuration instead of
    /// showing a generic failure.
    pub fn is_credential_missing(&self) -> bool {
        match self {
            AiError::AllProvidersFailed { failures } => {
                failures.iter().any(|f| f.error.is_credential_missing())
            }
            _ => false,
        }
    }

    /// Per-provider failures, in attempt order
    pub fn failures(&self) -> &[ProviderFailure] {
        match self {
            AiError::AllProvidersFailed { failures } => failures,
            _ => &[],
        }
    }
}
