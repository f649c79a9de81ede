//! Extraction events and observers.

use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use crate::types::{ExtractionMethod, Stage};

/// Which path handled one document at one stage, and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionEvent {
    pub doc_id: String,
    pub stage: Stage,
    pub method: ExtractionMethod,
    /// Fallback cause, or the fields backfilled after a model result.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Receives one event per document per extraction stage.
pub trait ExtractionObserver: Send + Sync {
    fn on_extraction(&self, event: &ExtractionEvent);
}

/// Emits each event as a structured `tracing` record.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ExtractionObserver for TracingObserver {
    fn on_extraction(&self, event: &ExtractionEvent) {
        info!(
            doc_id = %event.doc_id,
            stage = event.stage.as_str(),
            method = event.method.as_str(),
            reason = event.reason.as_deref().unwrap_or(""),
            "document extracted"
        );
    }
}

/// Buffers events in memory.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    events: Mutex<Vec<ExtractionEvent>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ExtractionEvent> {
        self.events.lock().clone()
    }

    /// Drain buffered events.
    pub fn take(&self) -> Vec<ExtractionEvent> {
        std::mem::take(&mut *self.events.lock())
    }
}

impl ExtractionObserver for CollectingObserver {
    fn on_extraction(&self, event: &ExtractionEvent) {
        self.events.lock().push(event.clone());
    }
}
