//! Document-level metadata rules.
//!
//! Every field is derived independently over the whole document: shop from a
//! `店名：` label or a `Name - description` title, rating next to a `星` or
//! `评分：` marker, the first ISO-like date, explicit `标签：` tags or a small
//! tag gazetteer, and ordered keyword buckets for focus and sentiment.

use once_cell::sync::Lazy;
use regex::Regex;
use savor_core::{
    first_matching_group, normalize_rating, DocumentMetadata, Focus, ReviewDocument, Sentiment,
    UNKNOWN_RATING, UNKNOWN_SHOP,
};

static SHOP_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"店名[:：]\s*([^\n]+)").unwrap());
static TITLE_SHOP: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\p{Han}\w\s]+)\s*[-–—]\s*").unwrap());
static CONTENT_RATING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9０-９])\s*星|评分[:：]\s*([0-9０-９])").unwrap());
static TITLE_RATING: Lazy<Regex> = Lazy::new(|| Regex::new(r"([0-9０-９])\s*星").unwrap());
static DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d{4}-\d{1,2}-\d{1,2})").unwrap());
static TAGS_LABEL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"标签[:：]\s*([^\n]+)").unwrap());
static TAG_DELIMITERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[，,；;]").unwrap());

/// Tag phrases recognised when the review has no explicit tag label.
pub const TAG_GAZETTEER: &[&str] = &[
    "环境好", "服务好", "味道棒", "味道一般", "偏贵", "食材新鲜", "上菜慢", "适合聚餐",
];

/// Ordered focus buckets for review text; the first bucket with a hit wins.
pub const DOCUMENT_FOCUS_GROUPS: &[(Focus, &[&str])] = &[
    (Focus::Taste, &["味", "口味", "好吃", "难吃"]),
    (Focus::Environment, &["环境", "雅致", "干净", "嘈杂"]),
    (Focus::Service, &["服务", "上菜", "态度"]),
    (Focus::Price, &["价格", "偏贵", "便宜", "人均"]),
];

/// Coarse whole-document sentiment buckets, positive tested first.
pub const DOCUMENT_SENTIMENT_GROUPS: &[(Sentiment, &[&str])] = &[
    (Sentiment::Positive, &["很好", "棒", "推荐", "满意", "愉快", "喜欢"]),
    (Sentiment::Negative, &["差", "失望", "不满", "不好", "太贵", "一般"]),
];

/// Derive metadata for a review with the rule-based path.
pub fn extract_metadata(doc: &ReviewDocument) -> DocumentMetadata {
    let content = doc.content.as_str();
    let title = doc.title_or_empty();

    DocumentMetadata {
        shop: extract_shop(content, title).unwrap_or_else(|| UNKNOWN_SHOP.to_string()),
        rating: extract_rating(content, title).unwrap_or_else(|| UNKNOWN_RATING.to_string()),
        date: extract_date(content).unwrap_or_default(),
        focus: classify_focus(content),
        tags: extract_tags(content),
        sentiment: classify_sentiment(content),
    }
}

pub fn extract_shop(content: &str, title: &str) -> Option<String> {
    let from_label = SHOP_LABEL
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string());
    if from_label.is_some() {
        return from_label;
    }
    TITLE_SHOP
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

pub fn extract_rating(content: &str, title: &str) -> Option<String> {
    if let Some(caps) = CONTENT_RATING.captures(content) {
        return caps
            .get(1)
            .or_else(|| caps.get(2))
            .map(|m| normalize_rating(m.as_str()));
    }
    TITLE_RATING
        .captures(title)
        .and_then(|c| c.get(1))
        .map(|m| normalize_rating(m.as_str()))
}

pub fn extract_date(content: &str) -> Option<String> {
    DATE.captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
}

/// Explicit `标签：` tags in source order, else gazetteer phrases present.
pub fn extract_tags(content: &str) -> Vec<String> {
    if let Some(list) = TAGS_LABEL.captures(content).and_then(|c| c.get(1)) {
        return split_tags(list.as_str());
    }
    TAG_GAZETTEER
        .iter()
        .filter(|kw| content.contains(*kw))
        .map(|kw| (*kw).to_string())
        .collect()
}

/// Split a delimited tag list, dropping blanks. Duplicates are kept.
pub fn split_tags(list: &str) -> Vec<String> {
    TAG_DELIMITERS
        .split(list)
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn classify_focus(content: &str) -> Focus {
    first_matching_group(content, DOCUMENT_FOCUS_GROUPS).unwrap_or_default()
}

pub fn classify_sentiment(content: &str) -> Sentiment {
    first_matching_group(content, DOCUMENT_SENTIMENT_GROUPS).unwrap_or_default()
}

/// Metadata as reported by a structured-extraction service.
///
/// `None` marks a field that was missing or carried a placeholder; those
/// are filled from the rule-based result by [`PartialMetadata::backfill`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialMetadata {
    pub shop: Option<String>,
    pub rating: Option<String>,
    pub date: Option<String>,
    pub focus: Option<Focus>,
    pub tags: Option<Vec<String>>,
    pub sentiment: Option<Sentiment>,
}

impl PartialMetadata {
    /// True when no field was extracted at all.
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of fields that will be taken from the fallback.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.shop.is_none() {
            missing.push("shop");
        }
        if self.rating.is_none() {
            missing.push("rating");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.focus.is_none() {
            missing.push("focus");
        }
        if self.tags.is_none() {
            missing.push("tags");
        }
        if self.sentiment.is_none() {
            missing.push("sentiment");
        }
        missing
    }

    /// Fill every missing field from `fallback`, keeping extracted ones.
    pub fn backfill(self, fallback: DocumentMetadata) -> DocumentMetadata {
        DocumentMetadata {
            shop: self.shop.unwrap_or(fallback.shop),
            rating: self.rating.unwrap_or(fallback.rating),
            date: self.date.unwrap_or(fallback.date),
            focus: self.focus.unwrap_or(fallback.focus),
            tags: self.tags.unwrap_or(fallback.tags),
            sentiment: self.sentiment.unwrap_or(fallback.sentiment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_labelled_review() {
        let doc = ReviewDocument::new(
            "rev_001",
            "店名：老王烧烤\n评分：5星\n时间：2024-03-15\n评价：羊肉串很好吃，服务热情。标签：味道好, 服务好；适合聚餐",
        );
        let md = extract_metadata(&doc);
        assert_eq!(md.shop, "老王烧烤");
        assert_eq!(md.rating, "5");
        assert_eq!(md.date, "2024-03-15");
        assert_eq!(md.focus, Focus::Taste);
        assert_eq!(md.tags, vec!["味道好", "服务好", "适合聚餐"]);
        // 很好吃 contains 很好.
        assert_eq!(md.sentiment, Sentiment::Positive);
    }

    #[test]
    fn test_title_fallbacks() {
        let doc = ReviewDocument::new("r2", "环境雅致，人均偏贵，上菜慢")
            .with_title("绿茶餐厅 - 4星 环境不错");
        let md = extract_metadata(&doc);
        assert_eq!(md.shop, "绿茶餐厅");
        assert_eq!(md.rating, "4");
        assert_eq!(md.date, "");
        assert_eq!(md.focus, Focus::Environment);
        assert_eq!(md.tags, vec!["偏贵", "上菜慢"]);
    }

    #[test]
    fn test_defaults_when_nothing_matches() {
        let md = extract_metadata(&ReviewDocument::new("r3", "路过"));
        assert_eq!(md, DocumentMetadata::default());
    }

    #[test]
    fn test_rating_alternatives() {
        assert_eq!(extract_rating("评分：3", ""), Some("3".into()));
        assert_eq!(extract_rating("给 4 星", ""), Some("4".into()));
        assert_eq!(extract_rating("没有评分", "2星推荐"), Some("2".into()));
        assert_eq!(extract_rating("没有评分", "评分：2"), None);
    }

    #[test]
    fn test_full_width_rating_is_stored_ascii() {
        assert_eq!(extract_rating("评分：５星", ""), Some("5".into()));
        assert_eq!(extract_rating("没有评分", "３星小店"), Some("3".into()));
        let doc = ReviewDocument::new("fw", "店名：老王烧烤\n评分：５星\n老王的串好吃");
        assert_eq!(extract_metadata(&doc).rating, "5");
    }

    #[test]
    fn test_focus_priority_order() {
        // Taste bucket is tested before service even though service words dominate.
        assert_eq!(classify_focus("服务态度好，上菜快，味道一般"), Focus::Taste);
        assert_eq!(classify_focus("服务态度好"), Focus::Service);
        assert_eq!(classify_focus("没什么特别"), Focus::Taste);
    }

    #[test]
    fn test_sentiment_positive_first() {
        assert_eq!(classify_sentiment("推荐，但是有点失望"), Sentiment::Positive);
        assert_eq!(classify_sentiment("很失望"), Sentiment::Negative);
    }

    #[test]
    fn test_split_tags_keeps_duplicates() {
        assert_eq!(split_tags("好吃，好吃; 便宜 ,"), vec!["好吃", "好吃", "便宜"]);
    }

    #[test]
    fn test_backfill_keeps_extracted_fields() {
        let partial = PartialMetadata {
            shop: Some("海鲜一品".into()),
            focus: Some(Focus::Price),
            ..Default::default()
        };
        assert_eq!(partial.missing_fields(), vec!["rating", "date", "tags", "sentiment"]);
        let fallback = DocumentMetadata {
            shop: "别的店".into(),
            rating: "3".into(),
            ..Default::default()
        };
        let md = partial.backfill(fallback);
        assert_eq!(md.shop, "海鲜一品");
        assert_eq!(md.rating, "3");
        assert_eq!(md.focus, Focus::Price);
    }
}
