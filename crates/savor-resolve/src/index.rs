//! In-memory review index: metadata predicates plus substring relevance.

use savor_core::{parse_rating, DocumentMetadata, IndexedDocument};
use tracing::{debug, info};

use crate::shop::shop_matches;
use crate::types::FilterSpec;

/// Holds indexed reviews in insertion order.
///
/// There is no incremental update: `add` replaces the contents wholesale.
#[derive(Debug, Clone, Default)]
pub struct RetrievalIndex {
    documents: Vec<IndexedDocument>,
}

impl RetrievalIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the index contents with `documents`.
    pub fn add(&mut self, documents: Vec<IndexedDocument>) {
        self.documents = documents;
        info!("Indexed {} reviews", self.documents.len());
    }

    pub fn documents(&self) -> &[IndexedDocument] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Documents relevant to `query`, optionally constrained by `filters`.
    ///
    /// Relevance means the lower-cased content contains at least one
    /// whitespace-separated token of the lower-cased query. With a
    /// non-empty filter every present predicate must also hold. Results
    /// keep insertion order and are not ranked.
    pub fn search(&self, query: &str, filters: Option<&FilterSpec>) -> Vec<&IndexedDocument> {
        let query = query.to_lowercase();
        let tokens: Vec<&str> = query.split_whitespace().collect();
        let filters = filters.filter(|f| !f.is_empty());

        let results: Vec<&IndexedDocument> = self
            .documents
            .iter()
            .filter(|doc| filters.map_or(true, |f| passes_filters(&doc.metadata, f)))
            .filter(|doc| is_relevant(doc.content(), &tokens))
            .collect();

        debug!(
            "Search {:?} (filtered={}) matched {} of {}",
            query,
            filters.is_some(),
            results.len(),
            self.documents.len()
        );
        results
    }
}

fn is_relevant(content: &str, tokens: &[&str]) -> bool {
    let content = content.to_lowercase();
    tokens.iter().any(|t| content.contains(t))
}

fn passes_filters(md: &DocumentMetadata, filters: &FilterSpec) -> bool {
    if let Some(shop) = &filters.shop {
        if !shop_matches(shop, &md.shop) {
            return false;
        }
    }
    if let Some(rating) = &filters.rating {
        if !rating_passes(rating, &md.rating) {
            return false;
        }
    }
    if let Some(focus) = filters.focus {
        if focus != md.focus {
            return false;
        }
    }
    if let Some(sentiment) = filters.sentiment {
        if sentiment != md.sentiment {
            return false;
        }
    }
    true
}

/// Numeric filters are lower bounds (unparseable document ratings count as
/// 0); anything else must equal the document rating exactly.
fn rating_passes(wanted: &str, indexed: &str) -> bool {
    match parse_rating(wanted) {
        Some(min) => parse_rating(indexed).unwrap_or(0) >= min,
        None => wanted == indexed,
    }
}
