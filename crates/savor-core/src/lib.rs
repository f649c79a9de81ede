//! Savor Core: review data model, aspect taxonomy, sentiment lexicon, configuration.
//!
//! Everything here is immutable once constructed. The catalog and lexicon
//! are built once by the host and passed by reference into every
//! component that scores or matches text.

pub mod capabilities;
pub mod catalog;
pub mod config;
pub mod error;
pub mod lexicon;
pub mod rating;
pub mod types;

pub use capabilities::{Capabilities, ExtractionMode};
pub use catalog::{AspectCatalog, AspectEntry, SubAspectEntry};
pub use config::{AdapterConfig, ExtractionSettings};
pub use error::{Error, Result};
pub use lexicon::{first_matching_group, SentimentLexicon};
pub use rating::{normalize_rating, parse_rating, rating_digit};
pub use types::*;
