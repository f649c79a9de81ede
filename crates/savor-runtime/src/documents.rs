//! Loading review documents from JSON.

use std::collections::HashSet;
use std::path::Path;

use savor_core::{Error, Result, ReviewDocument};
use tracing::info;

/// Parse a JSON array of `{id, content, title?}` objects.
///
/// Ids must be non-empty and unique.
pub fn parse_documents(json: &str) -> Result<Vec<ReviewDocument>> {
    let docs: Vec<ReviewDocument> = serde_json::from_str(json)?;
    let mut seen = HashSet::new();
    for doc in &docs {
        if doc.id.trim().is_empty() {
            return Err(Error::InvalidDocument("document id must not be empty".into()));
        }
        if !seen.insert(doc.id.as_str()) {
            return Err(Error::InvalidDocument(format!("duplicate document id: {}", doc.id)));
        }
    }
    Ok(docs)
}

pub fn load_documents(path: &Path) -> Result<Vec<ReviewDocument>> {
    let raw = std::fs::read_to_string(path)?;
    let docs = parse_documents(&raw)?;
    info!("Loaded {} reviews from {}", docs.len(), path.display());
    Ok(docs)
}
