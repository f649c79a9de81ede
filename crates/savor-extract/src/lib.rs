//! Savor Extract: rule-based opinion triple and metadata extraction.
//!
//! Sentence segmentation, negation-aware sentiment scoring, opinion span
//! bounding, per-sentence triple building, document metadata rules, and
//! parsing of structured-extraction records back into the data model.

pub mod metadata;
pub mod opinion;
pub mod records;
pub mod segment;
pub mod sentiment;
pub mod triples;

pub use metadata::{extract_metadata, PartialMetadata};
pub use opinion::opinion_span;
pub use records::{parse_metadata_records, parse_triple_records, TRIPLE_CLASS};
pub use segment::split_sentences;
pub use sentiment::{SentimentCounts, SentimentScorer};
pub use triples::TripleBuilder;
