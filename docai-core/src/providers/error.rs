//! Provider error types and handling

use crate::config::ProviderId;
use std::time::Duration;
use thiserror::Error;

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors a single provider call can fail with
///
/// Every variant is recoverable by the router: it is recorded and the next
/// provider in the priority chain is tried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No API key configured for the provider
    #[error("{provider} API key missing")]
    CredentialMissing { provider: ProviderId },

    /// Network failure or non-success HTTP status
    #[error("Transport error{}: {message}", status_suffix(.status))]
    Transport {
        status: Option<u16>,
        message: String,
    },

    /// The call did not complete within the configured timeout
    #[error("Request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    /// The provider could not be set up for this call
    #[error("Configuration error: {0}")]
    Configuration(String),
}

fn status_suffix(status: &Option<u16>) -> String {
    status
        .map(|code| format!(" (HTTP {})", code))
        .unwrap_or_default()
}

impl ProviderError {
    /// Build a transport error without an HTTP status
    pub fn network(message: impl Into<String>) -> Self {
        ProviderError::Transport {
            status: None,
            message: message.into(),
        }
    }

    /// Whether this failure means the provider still needs configuring
    pub fn is_credential_missing(&self) -> bool {
        matches!(self, ProviderError::CredentialMissing { .. })
    }

    /// HTTP status of a transport failure, if there was one
    pub fn status(&self) -> Option<u16> {
        match self {
            ProviderError::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            format!("Request timed out: {}", err)
        } else if err.is_connect() {
            format!("Connection failed: {}", err)
        } else {
            err.to_string()
        };

        ProviderError::Transport {
            status: err.status().map(|s| s.as_u16()),
            message,
        }
    }
}
