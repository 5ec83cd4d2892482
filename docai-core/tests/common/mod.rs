//! Shared test doubles

#![allow(dead_code)]

use async_trait::async_trait;
use docai_core::config::{ProviderId, ProviderSettings};
use docai_core::providers::{ProviderAdapter, ProviderError, ProviderResult, RequestPayload};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Adapter returning a canned answer and counting calls
pub struct MockAdapter {
    id: ProviderId,
    response: ProviderResult<String>,
    delay: Option<Duration>,
    calls: AtomicUsize,
    last_payload: Mutex<Option<RequestPayload>>,
    last_credential: Mutex<Option<String>>,
}

impl MockAdapter {
    pub fn ok(id: ProviderId, text: &str) -> Arc<Self> {
        Arc::new(Self::new(id, Ok(text.to_string()), None))
    }

    pub fn failing(id: ProviderId, message: &str) -> Arc<Self> {
        Arc::new(Self::new(
            id,
            Err(ProviderError::Transport {
                status: Some(500),
                message: message.to_string(),
            }),
            None,
        ))
    }

    pub fn slow(id: ProviderId, text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self::new(id, Ok(text.to_string()), Some(delay)))
    }

    fn new(id: ProviderId, response: ProviderResult<String>, delay: Option<Duration>) -> Self {
        Self {
            id,
            response,
            delay,
            calls: AtomicUsize::new(0),
            last_payload: Mutex::new(None),
            last_credential: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_payload(&self) -> Option<RequestPayload> {
        self.last_payload.lock().unwrap().clone()
    }

    pub fn last_credential(&self) -> Option<String> {
        self.last_credential.lock().unwrap().clone()
    }
}

#[async_trait]
impl ProviderAdapter for MockAdapter {
    fn id(&self) -> ProviderId {
        self.id
    }

    async fn call(
        &self,
        settings: &ProviderSettings,
        payload: &RequestPayload,
    ) -> ProviderResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_payload.lock().unwrap() = Some(payload.clone());
        *self.last_credential.lock().unwrap() =
            Some(settings.credential.expose_secret().to_string());

        if settings.credential.is_empty() {
            return Err(ProviderError::CredentialMissing { provider: self.id });
        }
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.response.clone()
    }
}
