//! HTTP error mapping utilities

use crate::providers::ProviderError;
use reqwest::StatusCode;
use uuid::Uuid;

/// Map a non-success HTTP status and its body to a transport error
///
/// The body is carried with only surrounding whitespace trimmed: vendors put the useful
/// explanation there and the admin surface shows it when a connection check
/// fails. An empty body falls back to the status reason.
pub fn map_http_error(
    vendor: &str,
    status: StatusCode,
    body: Option<String>,
    request_id: Uuid,
) -> ProviderError {
    let body = body
        .map(|b| b.trim().to_string())
        .filter(|b| !b.is_empty())
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("no response body")
                .to_string()
        });

    ProviderError::Transport {
        status: Some(status.as_u16()),
        message: format!(
            "{} API Error: {} {} [request_id: {}]",
            vendor,
            status.as_u16(),
            body,
            request_id
        ),
    }
}
