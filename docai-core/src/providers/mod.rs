//! Provider adapters and fallback routing
//!
//! Each adapter translates the generic [`RequestPayload`] into one vendor's
//! wire protocol and back into plain text. The [`FallbackRouter`] picks
//! adapters according to the configured priority chain.

pub mod adapter;
pub mod bailian;
pub mod error;
pub mod gemini;
pub mod routing;

pub use adapter::{OutputMode, ProviderAdapter, RequestPayload, SAMPLING_TEMPERATURE};
pub use error::{ProviderError, ProviderResult};
pub use routing::{FallbackRouter, RoutingResult};

// Re-export concrete adapters
pub use bailian::BailianAdapter;
pub use gemini::GeminiAdapter;
