//! HTTP client implementation using reqwest

use crate::http::RequestOptions;
use crate::providers::{ProviderError, ProviderResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, ClientBuilder, Response};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Maximum response size (10MB)
const MAX_RESPONSE_SIZE: usize = 10 * 1024 * 1024;

/// Default user agent
const USER_AGENT: &str = concat!("docai/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client with connection pooling
///
/// No overall request timeout is set here; the router bounds each provider
/// call with the configured per-provider timeout instead.
#[derive(Clone)]
pub struct HttpClient {
    /// The underlying reqwest client
    client: Arc<Client>,

    /// Maximum response size to prevent OOM
    max_response_size: usize,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> ProviderResult<Self> {
        Self::with_config(Duration::from_secs(10), 10)
    }

    /// Create a new HTTP client with custom pool settings
    pub fn with_config(connect_timeout: Duration, max_idle_per_host: usize) -> ProviderResult<Self> {
        let client = ClientBuilder::new()
            .pool_max_idle_per_host(max_idle_per_host)
            .pool_idle_timeout(Duration::from_secs(90))
            .connect_timeout(connect_timeout)
            .user_agent(USER_AGENT)
            .gzip(true)
            .build()
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client: Arc::new(client),
            max_response_size: MAX_RESPONSE_SIZE,
        })
    }

    /// Check response size to prevent OOM
    fn check_content_length(&self, response: &Response) -> ProviderResult<()> {
        if let Some(content_length) = response.content_length() {
            if content_length as usize > self.max_response_size {
                return Err(ProviderError::network(format!(
                    "Response size {} exceeds maximum {}",
                    content_length, self.max_response_size
                )));
            }
        }

        Ok(())
    }

    fn build_headers(headers: &[(&str, String)]) -> ProviderResult<HeaderMap> {
        let mut map = HeaderMap::new();
        for (name, value) in headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| ProviderError::Configuration(format!("Invalid header name: {}", e)))?;
            // Never echo the value: it is usually a credential
            let value = HeaderValue::from_str(value).map_err(|_| {
                ProviderError::Configuration(format!("Invalid characters in header '{}'", name))
            })?;
            map.insert(name, value);
        }
        Ok(map)
    }

    /// POST a JSON body and return the parsed JSON response
    ///
    /// Non-2xx statuses become [`ProviderError::Transport`] carrying the
    /// status code and the response body.
    pub async fn post_json<B: Serialize + ?Sized>(
        &self,
        url: &str,
        headers: &[(&str, String)],
        body: &B,
        options: RequestOptions,
    ) -> ProviderResult<Value> {
        let request_id = options.request_id;
        let vendor = options.vendor;

        info!("Executing HTTP request to {} [request_id: {}]", vendor, request_id);
        debug!("Request URL: {}", url);

        let response = self
            .client
            .post(url)
            .headers(Self::build_headers(headers)?)
            .header("X-Request-ID", request_id.to_string())
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!("Request error for {} [request_id: {}]: {}", vendor, request_id, e);
                ProviderError::from(e)
            })?;

        let status = response.status();
        debug!("Response status: {} [request_id: {}]", status, request_id);

        if !status.is_success() {
            let body = response.text().await.ok();

            warn!(
                "Request failed with status {} for {} [request_id: {}]",
                status, vendor, request_id
            );

            return Err(crate::http::error::map_http_error(vendor, status, body, request_id));
        }

        self.check_content_length(&response)?;

        let response_text = response.text().await.map_err(|e| {
            ProviderError::network(format!(
                "Failed to read response body: {} [request_id: {}]",
                e, request_id
            ))
        })?;

        if response_text.len() > self.max_response_size {
            return Err(ProviderError::network(format!(
                "Response size {} exceeds maximum {} [request_id: {}]",
                response_text.len(),
                self.max_response_size,
                request_id
            )));
        }

        let json: Value = serde_json::from_str(&response_text).map_err(|e| {
            error!(
                "Failed to parse response from {} [request_id: {}]: {}",
                vendor, request_id, e
            );
            ProviderError::Transport {
                status: Some(status.as_u16()),
                message: format!("Invalid response format: {} [request_id: {}]", e, request_id),
            }
        })?;

        info!(
            "Request completed successfully for {} [request_id: {}]",
            vendor, request_id
        );

        Ok(json)
    }
}
