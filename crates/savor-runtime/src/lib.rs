//! Runtime engine: coordinates extraction, indexing and recall.
//!
//! `ReviewEngine` tries a structured-extraction adapter first when one is
//! passed in, falls back to the rule-based extractors per document, reports
//! which path ran through an `ExtractionObserver`, and answers queries from
//! an in-memory `RetrievalIndex`.

pub mod documents;
pub mod engine;
pub mod observer;
pub mod prompts;
pub mod types;

pub use documents::{load_documents, parse_documents};
pub use engine::ReviewEngine;
pub use observer::{CollectingObserver, ExtractionEvent, ExtractionObserver, TracingObserver};
pub use types::*;
