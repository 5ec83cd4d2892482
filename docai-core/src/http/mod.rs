//! HTTP client module for calling AI vendor APIs
//!
//! This module implements the HTTP layer shared by every adapter:
//! - Connection pooling and client management
//! - Error mapping for non-success statuses
//! - Request ID generation and correlation

pub mod client;
pub mod error;

pub use client::HttpClient;
pub use error::map_http_error;

use uuid::Uuid;

/// Options for an HTTP request
#[derive(Debug, Clone)]
pub struct RequestOptions {
    /// Vendor label used in logs and error messages
    pub vendor: &'static str,

    /// Unique request ID for correlation
    pub request_id: Uuid,
}

impl RequestOptions {
    /// Create new request options with a generated request ID
    pub fn new(vendor: &'static str) -> Self {
        Self {
            vendor,
            request_id: Uuid::new_v4(),
        }
    }
}
