//! Runtime types.

use savor_core::{ExtractionMode, IndexedDocument};
use savor_resolve::FilterSpec;
use serde::Serialize;

/// Which path produced a document's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Structured-extraction adapter.
    Model,
    /// Keyword heuristics.
    RuleBased,
}

impl ExtractionMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Model => "model",
            Self::RuleBased => "rule_based",
        }
    }
}

/// Extraction stage an event refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    Triples,
    Metadata,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Triples => "triples",
            Self::Metadata => "metadata",
        }
    }
}

/// A query answered with and without its planned filters.
#[derive(Debug, Clone, Serialize)]
pub struct RecallResult<'a> {
    pub query: String,
    pub filters: FilterSpec,
    /// Documents passing the planned filters and the relevance test.
    pub documents: Vec<&'a IndexedDocument>,
    /// Documents passing the relevance test alone.
    pub unfiltered: Vec<&'a IndexedDocument>,
}

/// Engine status information.
#[derive(Debug, Clone, Serialize)]
pub struct RuntimeStatus {
    pub mode: ExtractionMode,
    #[serde(rename = "adapterModel", skip_serializing_if = "Option::is_none")]
    pub adapter_model: Option<String>,
    #[serde(rename = "indexedDocuments")]
    pub indexed_documents: usize,
    #[serde(rename = "catalogAspects")]
    pub catalog_aspects: usize,
    #[serde(rename = "extractionPasses")]
    pub extraction_passes: u32,
}
