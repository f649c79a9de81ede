//! Review documents, opinion triples, and document metadata.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Placeholder shop name when none could be derived.
pub const UNKNOWN_SHOP: &str = "未知";
/// Placeholder rating when none could be derived.
pub const UNKNOWN_RATING: &str = "unknown";

/// Three-way sentiment polarity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    #[default]
    Neutral,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
        }
    }

    /// Compare two polarity counts: the larger side wins, equal is neutral.
    pub fn from_counts(pos: i64, neg: i64) -> Self {
        match pos.cmp(&neg) {
            std::cmp::Ordering::Greater => Self::Positive,
            std::cmp::Ordering::Less => Self::Negative,
            std::cmp::Ordering::Equal => Self::Neutral,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" | "正面" | "积极" => Ok(Self::Positive),
            "negative" | "负面" | "消极" => Ok(Self::Negative),
            "neutral" | "中性" => Ok(Self::Neutral),
            other => Err(format!("unknown sentiment: {}", other)),
        }
    }
}

/// Primary concern of a review or query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Focus {
    #[default]
    #[serde(alias = "口味")]
    Taste,
    #[serde(alias = "环境")]
    Environment,
    #[serde(alias = "服务")]
    Service,
    #[serde(alias = "价格")]
    Price,
}

impl Focus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Taste => "taste",
            Self::Environment => "environment",
            Self::Service => "service",
            Self::Price => "price",
        }
    }

    /// Chinese label used in review text and model prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Taste => "口味",
            Self::Environment => "环境",
            Self::Service => "服务",
            Self::Price => "价格",
        }
    }
}

impl std::fmt::Display for Focus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Focus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "taste" | "口味" => Ok(Self::Taste),
            "environment" | "环境" => Ok(Self::Environment),
            "service" | "服务" => Ok(Self::Service),
            "price" | "价格" => Ok(Self::Price),
            other => Err(format!("unknown focus: {}", other)),
        }
    }
}

/// A raw review as supplied by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewDocument {
    pub id: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl ReviewDocument {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            title: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn title_or_empty(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }
}

/// One (aspect, sub-aspect, opinion span, sentiment) statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpinionTriple {
    pub aspect: String,
    /// Empty when no sub-aspect keyword matched anywhere.
    #[serde(default)]
    pub sub_aspect: String,
    pub opinion: String,
    pub sentiment: Sentiment,
}

/// Per-document triple extraction output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripleExtraction {
    pub id: String,
    pub triples: Vec<OpinionTriple>,
    /// True when the structured-extraction adapter produced the triples.
    pub used_model: bool,
}

/// Document-level fields derived from a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub shop: String,
    /// A single digit `1`–`5`, or `unknown`.
    pub rating: String,
    /// `YYYY-MM-DD`-like, or empty.
    pub date: String,
    pub focus: Focus,
    /// In source order; duplicates are kept.
    pub tags: Vec<String>,
    pub sentiment: Sentiment,
}

impl Default for DocumentMetadata {
    fn default() -> Self {
        Self {
            shop: UNKNOWN_SHOP.to_string(),
            rating: UNKNOWN_RATING.to_string(),
            date: String::new(),
            focus: Focus::Taste,
            tags: Vec::new(),
            sentiment: Sentiment::Neutral,
        }
    }
}

/// A review paired with its derived metadata, as held by the retrieval index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexedDocument {
    #[serde(flatten)]
    pub document: ReviewDocument,
    pub metadata: DocumentMetadata,
}

impl IndexedDocument {
    pub fn new(document: ReviewDocument, metadata: DocumentMetadata) -> Self {
        Self { document, metadata }
    }

    pub fn id(&self) -> &str {
        &self.document.id
    }

    pub fn content(&self) -> &str {
        &self.document.content
    }
}

/// One record returned by a structured-extraction service.
///
/// `extraction_text` is the payload: a JSON object for opinion triples, or
/// plain text for metadata fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionRecord {
    pub extraction_class: String,
    pub extraction_text: String,
}

impl ExtractionRecord {
    pub fn new(class: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            extraction_class: class.into(),
            extraction_text: text.into(),
        }
    }
}
