//! Public task API used by the portal's UI handlers
//!
//! The service re-reads the configuration from the store for every task, so
//! an admin saving new settings takes effect on the next call without any
//! shared in-memory copy.

use crate::config::{self, AiConfig, ConfigStore, ProviderId};
use crate::corpus::DocumentCorpus;
use crate::error::AiError;
use crate::providers::{FallbackRouter, ProviderResult};
use crate::tasks::{self, ChatTurn, ExtractedDocument};
use std::sync::Arc;
use tracing::{error, info};

/// Binds the configuration store, document corpus and router together
#[derive(Clone)]
pub struct AiService {
    store: Arc<dyn ConfigStore>,
    corpus: Arc<dyn DocumentCorpus>,
    router: FallbackRouter,
}

impl AiService {
    /// Create a service using the built-in Gemini and Bailian adapters
    pub fn new(store: Arc<dyn ConfigStore>, corpus: Arc<dyn DocumentCorpus>) -> ProviderResult<Self> {
        Ok(Self::with_router(store, corpus, FallbackRouter::with_default_adapters()?))
    }

    /// Create a service with a custom router
    pub fn with_router(
        store: Arc<dyn ConfigStore>,
        corpus: Arc<dyn DocumentCorpus>,
        router: FallbackRouter,
    ) -> Self {
        Self {
            store,
            corpus,
            router,
        }
    }

    /// Current configuration, resolved from whatever the store holds
    pub fn load_config(&self) -> Result<AiConfig, AiError> {
        Ok(config::load_config(self.store.as_ref())?)
    }

    /// Validate and persist a configuration edited by the admin surface
    pub fn save_config(&self, config: &AiConfig) -> Result<(), AiError> {
        config::save_config(self.store.as_ref(), config)?;
        info!("Saved AI configuration (priority: {:?})", config.priority);
        Ok(())
    }

    /// Whether one provider answers a trivial prompt
    ///
    /// Goes straight to that provider: priority order and enable flags are
    /// not consulted. Never fails; any error reads as `false`.
    pub async fn check_connection(&self, provider: ProviderId) -> bool {
        let config = match self.load_config() {
            Ok(config) => config,
            Err(e) => {
                error!("Connection check failed for {}: {}", provider, e);
                return false;
            }
        };

        match self
            .router
            .call_provider(provider, &config, &tasks::connection_check_payload())
            .await
        {
            Ok(reply) => !reply.is_empty(),
            Err(e) => {
                error!("Connection check failed for {}: {}", provider, e);
                false
            }
        }
    }

    /// Rewrite or generate Markdown content following an instruction
    pub async fn generate_content_suggestion(
        &self,
        current_content: &str,
        instruction: &str,
    ) -> Result<String, AiError> {
        let config = self.load_config()?;
        let payload = tasks::content_suggestion_payload(current_content, instruction);
        let raw = self.router.run("Generate Content", &config, &payload).await?;
        Ok(tasks::clean_suggestion(&raw))
    }

    /// Translate a UI label to concise Title-Case English
    pub async fn translate_to_english(&self, text: &str) -> Result<String, AiError> {
        let config = self.load_config()?;
        let payload = tasks::label_translation_payload(text);
        let raw = self.router.run("Translate", &config, &payload).await?;
        Ok(tasks::clean_label(&raw))
    }

    /// Split a long raw document into titled, categorized sub-documents
    pub async fn analyze_document(&self, raw_document: &str) -> Result<Vec<ExtractedDocument>, AiError> {
        let config = self.load_config()?;
        let payload = tasks::document_extraction_payload(raw_document);
        let raw = self.router.run("Analyze Document", &config, &payload).await?;
        tasks::parse_extracted_documents(&raw).inspect_err(|e| {
            error!("Failed to parse structured output from AI response: {}", e);
        })
    }

    /// Answer a question grounded in the published documentation
    pub async fn chat_with_site_content(
        &self,
        history: &[ChatTurn],
        message: &str,
    ) -> Result<String, AiError> {
        let config = self.load_config()?;
        let documents = self.corpus.documents();
        let payload = tasks::grounded_chat_payload(&documents, history, message);
        self.router.run("Chat with Content", &config, &payload).await
    }
}
