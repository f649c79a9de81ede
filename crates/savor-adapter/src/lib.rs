//! Savor Adapter: the structured-extraction collaborator contract.
//!
//! Provides the `ExtractionAdapter` trait that remote extraction services
//! implement. When the `remote` feature is enabled, `OpenAiCompatAdapter`
//! talks to any OpenAI-compatible chat completions endpoint. Without it,
//! `create_adapter` returns `None` and the engine runs rule-based only.

pub mod adapter;
pub mod error;
pub mod wire;

#[cfg(feature = "remote")]
pub mod openai;

pub use adapter::{
    invoke, AdapterOutcome, ExampleData, ExtractionAdapter, ExtractionRequest, ExtractionResult,
};
pub use error::AdapterError;

#[cfg(feature = "remote")]
pub use openai::OpenAiCompatAdapter;

use std::sync::Arc;

use savor_core::AdapterConfig;

/// Build the remote adapter for `config`.
///
/// Fails with `Error::Adapter` when the `remote` feature is not compiled in
/// or the HTTP client cannot be constructed.
pub fn build_adapter(config: &AdapterConfig) -> savor_core::Result<Arc<dyn ExtractionAdapter>> {
    #[cfg(feature = "remote")]
    {
        let adapter = OpenAiCompatAdapter::new(config)?;
        Ok(Arc::new(adapter))
    }

    #[cfg(not(feature = "remote"))]
    {
        let _ = config;
        Err(savor_core::Error::Adapter(
            "built without the `remote` feature".into(),
        ))
    }
}

/// Build the best available adapter for the given configuration.
///
/// Returns `None` when no remote client is compiled in or it cannot be
/// constructed; callers record that once as the rule-based capability.
pub fn create_adapter(config: &AdapterConfig) -> Option<Arc<dyn ExtractionAdapter>> {
    match build_adapter(config) {
        Ok(adapter) => {
            tracing::info!("Using remote extraction adapter (model={})", adapter.model_id());
            Some(adapter)
        }
        Err(e) => {
            tracing::warn!("{}. Using rule-based extraction.", e);
            None
        }
    }
}
