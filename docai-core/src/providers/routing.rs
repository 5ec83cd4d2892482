//! Priority-ordered routing with fallback
//!
//! The router walks the configured priority chain, skips disabled providers,
//! and returns the first answer it gets. Failures are accumulated in attempt
//! order so callers can see which providers were tried and why each failed.
//! There is at most one successful call per run; an empty answer still counts.

use crate::config::{expand_credential, AiConfig, ProviderId};
use crate::error::{AiError, ProviderFailure};
use crate::http::HttpClient;
use crate::providers::adapter::{ProviderAdapter, RequestPayload};
use crate::providers::bailian::BailianAdapter;
use crate::providers::error::{ProviderError, ProviderResult};
use crate::providers::gemini::GeminiAdapter;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of a successful routed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoutingResult {
    /// The answer, possibly empty
    pub text: String,

    /// Which provider answered
    pub provider_used: ProviderId,

    /// Whether an earlier provider failed before this one answered
    pub used_fallback: bool,

    /// Providers passed over because they are disabled
    pub skipped: Vec<ProviderId>,

    /// Failures recorded before the successful provider, in attempt order
    pub failures: Vec<ProviderFailure>,
}

/// Routes a task across the configured providers
#[derive(Clone, Default)]
pub struct FallbackRouter {
    adapters: BTreeMap<ProviderId, Arc<dyn ProviderAdapter>>,
}

impl FallbackRouter {
    /// Create a router with no adapters registered
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router with the Gemini and Bailian adapters sharing one HTTP client
    pub fn with_default_adapters() -> ProviderResult<Self> {
        let http = HttpClient::new()?;
        Ok(Self::new()
            .with_adapter(Arc::new(GeminiAdapter::new(http.clone())))
            .with_adapter(Arc::new(BailianAdapter::new(http))))
    }

    /// Register (or replace) the adapter serving `adapter.id()`
    pub fn with_adapter(mut self, adapter: Arc<dyn ProviderAdapter>) -> Self {
        self.adapters.insert(adapter.id(), adapter);
        self
    }

    /// Providers with a registered adapter
    pub fn providers(&self) -> Vec<ProviderId> {
        self.adapters.keys().copied().collect()
    }

    /// Call one provider directly, ignoring priority and enable flags
    pub async fn call_provider(
        &self,
        id: ProviderId,
        config: &AiConfig,
        payload: &RequestPayload,
    ) -> ProviderResult<String> {
        let adapter = self.adapters.get(&id).ok_or_else(|| {
            ProviderError::Configuration(format!("No adapter registered for {}", id))
        })?;

        // An unusable reference leaves the provider without a credential
        let settings = expand_credential(config.provider(id)).map_err(|e| {
            warn!("Cannot resolve credential for {}: {}", id, e);
            ProviderError::CredentialMissing { provider: id }
        })?;

        match config.request_timeout_secs {
            0 => adapter.call(&settings, payload).await,
            secs => {
                let limit = Duration::from_secs(secs);
                tokio::time::timeout(limit, adapter.call(&settings, payload))
                    .await
                    .unwrap_or(Err(ProviderError::Timeout(limit)))
            }
        }
    }

    /// Run a task through the priority chain, returning the full outcome
    pub async fn route(
        &self,
        task: &str,
        config: &AiConfig,
        payload: &RequestPayload,
    ) -> Result<RoutingResult, AiError> {
        if !config.enabled {
            debug!("Refusing {}: AI features are disabled", task);
            return Err(AiError::Disabled);
        }

        let mut skipped = Vec::new();
        let mut failures = Vec::new();

        for &id in &config.priority {
            if !config.provider(id).enabled {
                debug!("Skipping disabled provider {} for {}", id, task);
                skipped.push(id);
                continue;
            }

            info!("Attempting {} with {}...", task, id);
            match self.call_provider(id, config, payload).await {
                Ok(text) => {
                    if !failures.is_empty() {
                        info!("{} succeeded on fallback provider {}", task, id);
                    }
                    return Ok(RoutingResult {
                        text,
                        provider_used: id,
                        used_fallback: !failures.is_empty(),
                        skipped,
                        failures,
                    });
                }
                Err(error) => {
                    warn!("{} failed for {}: {}", id, task, error);
                    failures.push(ProviderFailure { provider: id, error });
                }
            }
        }

        warn!(
            "All enabled AI providers failed for {} ({} attempted)",
            task,
            failures.len()
        );
        Err(AiError::AllProvidersFailed { failures })
    }

    /// Run a task through the priority chain, returning only the answer
    pub async fn run(
        &self,
        task: &str,
        config: &AiConfig,
        payload: &RequestPayload,
    ) -> Result<String, AiError> {
        self.route(task, config, payload).await.map(|r| r.text)
    }
}
