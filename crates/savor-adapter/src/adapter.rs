//! Adapter trait, request/result types and the call outcome.

use savor_core::ExtractionRecord;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::AdapterError;

/// A worked example shown to the extraction service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleData {
    pub text: String,
    pub extractions: Vec<ExtractionRecord>,
}

impl ExampleData {
    pub fn new(text: impl Into<String>, extractions: Vec<ExtractionRecord>) -> Self {
        Self {
            text: text.into(),
            extractions,
        }
    }
}

/// One extraction call.
#[derive(Debug, Clone, Copy)]
pub struct ExtractionRequest<'a> {
    /// Document text to extract from.
    pub text: &'a str,
    /// Natural-language task description.
    pub task: &'a str,
    pub examples: &'a [ExampleData],
    /// Passed through uninterpreted.
    pub passes: u32,
}

/// Ordered records returned by one call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub extractions: Vec<ExtractionRecord>,
}

/// Trait for structured-extraction services.
pub trait ExtractionAdapter: Send + Sync {
    /// Run one extraction. Any failure is reported, never panicked.
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<ExtractionResult, AdapterError>;

    /// Model identifier, for logs and status.
    fn model_id(&self) -> &str;
}

/// Result of trying the adapter for one document.
#[derive(Debug)]
pub enum AdapterOutcome {
    Extracted(ExtractionResult),
    /// No adapter was supplied, or the caller disabled it.
    Unavailable,
    Failed(AdapterError),
}

impl AdapterOutcome {
    pub fn is_extracted(&self) -> bool {
        matches!(self, Self::Extracted(_))
    }

    /// Short label used in extraction events.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Extracted(_) => "extracted",
            Self::Unavailable => "unavailable",
            Self::Failed(_) => "failed",
        }
    }
}

/// Call `adapter` if present and fold the result into an outcome.
pub fn invoke(adapter: Option<&dyn ExtractionAdapter>, request: &ExtractionRequest<'_>) -> AdapterOutcome {
    let Some(adapter) = adapter else {
        return AdapterOutcome::Unavailable;
    };
    debug!(
        "Calling extraction adapter {} ({} chars, {} examples, passes={})",
        adapter.model_id(),
        request.text.chars().count(),
        request.examples.len(),
        request.passes
    );
    match adapter.extract(request) {
        Ok(result) => AdapterOutcome::Extracted(result),
        Err(e) => {
            warn!("Extraction call to {} failed: {}", adapter.model_id(), e);
            AdapterOutcome::Failed(e)
        }
    }
}
