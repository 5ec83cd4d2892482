//! DocAI Core Library
//!
//! Multi-provider AI request orchestration for the DevCenter documentation
//! portal: configuration migration, per-provider adapters, priority-ordered
//! fallback and the task formatters built on top of them.

pub mod config;
pub mod corpus;
pub mod error;
pub mod http;
pub mod logging;
pub mod providers;
pub mod service;
pub mod tasks;

pub use config::{resolve, AiConfig, ProviderId, ProviderSettings};
pub use error::{AiError, ProviderFailure};
pub use providers::{FallbackRouter, OutputMode, ProviderAdapter, ProviderError, RequestPayload};
pub use service::AiService;

/// Returns the version of the DocAI Core library.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
