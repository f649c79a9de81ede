//! Extraction capability detection.

use serde::{Deserialize, Serialize};

/// Which extraction path is available to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Keyword heuristics only; no structured-extraction adapter present.
    RuleBased,
    /// A remote adapter is tried first, heuristics backfill and fall back.
    ModelAssisted,
}

impl std::fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RuleBased => write!(f, "rule_based"),
            Self::ModelAssisted => write!(f, "model_assisted"),
        }
    }
}

/// Capabilities recorded once at startup.
///
/// `adapter_available == false` is the "adapter unavailable" condition: it
/// is decided once here and never raised per call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub adapter_available: bool,
    pub mode: ExtractionMode,
}

impl Capabilities {
    /// Record whether a structured-extraction adapter was built.
    pub fn discover(adapter_available: bool) -> Self {
        let mode = if adapter_available {
            ExtractionMode::ModelAssisted
        } else {
            ExtractionMode::RuleBased
        };
        Self {
            adapter_available,
            mode,
        }
    }

    pub fn rule_based() -> Self {
        Self::discover(false)
    }
}
