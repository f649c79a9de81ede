//! Parsing structured-extraction records into triples and metadata.
//!
//! A malformed record is skipped and never fails the whole batch.

use savor_core::{
    rating_digit, AspectCatalog, ExtractionRecord, Focus, OpinionTriple, Sentiment,
    UNKNOWN_RATING, UNKNOWN_SHOP,
};
use serde_json::Value;
use tracing::debug;

use crate::metadata::{split_tags, PartialMetadata};

/// Record class carrying an opinion triple payload.
pub const TRIPLE_CLASS: &str = "opinion_triple";

pub const SHOP_CLASS: &str = "shop_name";
pub const RATING_CLASS: &str = "rating";
pub const DATE_CLASS: &str = "review_date";
pub const FOCUS_CLASS: &str = "review_focus";
pub const TAGS_CLASS: &str = "tags";
pub const SENTIMENT_CLASS: &str = "sentiment";

const ASPECT_KEYS: &[&str] = &["aspect", "类别"];
const SUB_ASPECT_KEYS: &[&str] = &["sub_aspect", "subAspect", "细分"];
const OPINION_KEYS: &[&str] = &["opinion", "观点"];
const SENTIMENT_KEYS: &[&str] = &["sentiment", "情感"];

/// Convert `opinion_triple` records into triples.
///
/// Each payload is a JSON object or an array of objects. A missing
/// sub-aspect is inferred from the opinion text with the aspect as hint.
/// Records that are not valid JSON, items that are not objects, items
/// naming an aspect outside the catalog, and items with neither aspect nor
/// opinion are skipped.
pub fn parse_triple_records(
    records: &[ExtractionRecord],
    catalog: &AspectCatalog,
) -> Vec<OpinionTriple> {
    let mut triples = Vec::new();
    let mut skipped = 0usize;

    for record in records {
        if record.extraction_class != TRIPLE_CLASS {
            continue;
        }
        let payload: Value = match serde_json::from_str(record.extraction_text.trim()) {
            Ok(v) => v,
            Err(e) => {
                debug!("Skipping malformed triple record: {}", e);
                skipped += 1;
                continue;
            }
        };
        let items = match payload {
            Value::Array(items) => items,
            other => vec![other],
        };
        for item in &items {
            match triple_from_value(item, catalog) {
                Some(t) => triples.push(t),
                None => skipped += 1,
            }
        }
    }

    if skipped > 0 {
        debug!("Skipped {} unusable triple records", skipped);
    }
    triples
}

fn triple_from_value(item: &Value, catalog: &AspectCatalog) -> Option<OpinionTriple> {
    let obj = item.as_object()?;
    let aspect = first_string(obj, ASPECT_KEYS);
    let opinion = first_string(obj, OPINION_KEYS);

    if aspect.is_empty() && opinion.is_empty() {
        return None;
    }
    if !aspect.is_empty() && !catalog.contains_aspect(&aspect) {
        debug!("Skipping triple with unknown aspect {:?}", aspect);
        return None;
    }

    let mut sub_aspect = first_string(obj, SUB_ASPECT_KEYS);
    if sub_aspect.is_empty() && !opinion.is_empty() {
        let hint = (!aspect.is_empty()).then_some(aspect.as_str());
        sub_aspect = catalog.infer_sub_aspect(&opinion, hint).to_string();
    }

    let sentiment = first_string(obj, SENTIMENT_KEYS)
        .parse::<Sentiment>()
        .unwrap_or_default();

    Some(OpinionTriple {
        aspect,
        sub_aspect,
        opinion,
        sentiment,
    })
}

/// First non-empty string value among `keys`.
fn first_string(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> String {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .unwrap_or("")
        .to_string()
}

/// Collect metadata field records.
///
/// Payloads are plain text or a JSON-encoded string. Placeholders (`未知`,
/// `unknown`, empty) and unparseable focus/sentiment values leave the field
/// unset so it can be backfilled. A later record of the same class wins.
pub fn parse_metadata_records(records: &[ExtractionRecord]) -> PartialMetadata {
    let mut md = PartialMetadata::default();

    for record in records {
        let Some(text) = payload_text(&record.extraction_text) else {
            continue;
        };
        match record.extraction_class.as_str() {
            SHOP_CLASS => md.shop = Some(text),
            RATING_CLASS => {
                let digit = text.chars().find_map(rating_digit);
                md.rating = Some(digit.map(|d| d.to_string()).unwrap_or(text));
            }
            DATE_CLASS => md.date = Some(text),
            FOCUS_CLASS => match text.parse::<Focus>() {
                Ok(f) => md.focus = Some(f),
                Err(e) => debug!("Ignoring focus record: {}", e),
            },
            TAGS_CLASS => {
                let tags = split_tags(&text);
                if !tags.is_empty() {
                    md.tags = Some(tags);
                }
            }
            SENTIMENT_CLASS => match text.parse::<Sentiment>() {
                Ok(s) => md.sentiment = Some(s),
                Err(e) => debug!("Ignoring sentiment record: {}", e),
            },
            other => debug!("Ignoring metadata record of class {}", other),
        }
    }
    md
}

/// Unwrap a JSON string payload and drop placeholders.
fn payload_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let text = match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(s)) => s.trim().to_string(),
        _ => trimmed.to_string(),
    };
    if is_placeholder(&text) {
        None
    } else {
        Some(text)
    }
}

fn is_placeholder(text: &str) -> bool {
    text.is_empty() || text == UNKNOWN_SHOP || text.eq_ignore_ascii_case(UNKNOWN_RATING)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(class: &str, text: &str) -> ExtractionRecord {
        ExtractionRecord::new(class, text)
    }

    #[test]
    fn test_parse_object_and_array_payloads() {
        let catalog = AspectCatalog::restaurant();
        let records = vec![
            rec(
                TRIPLE_CLASS,
                r#"{"aspect":"菜品","sub_aspect":"口感","opinion":"羊肉串多汁","sentiment":"positive"}"#,
            ),
            rec(
                TRIPLE_CLASS,
                r#"[{"类别":"环境","观点":"太吵了","情感":"negative"},{"aspect":"价格","opinion":"偏贵","sentiment":"negative"}]"#,
            ),
        ];
        let triples = parse_triple_records(&records, &catalog);
        assert_eq!(triples.len(), 3);
        assert_eq!(triples[0].sub_aspect, "口感");
        assert_eq!(triples[1].aspect, "环境");
        // Inferred from 吵 under the 环境 hint.
        assert_eq!(triples[1].sub_aspect, "嘈杂情况");
        assert_eq!(triples[1].sentiment, Sentiment::Negative);
        assert_eq!(triples[2].sub_aspect, "价格水平");
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let catalog = AspectCatalog::restaurant();
        let records = vec![
            rec(TRIPLE_CLASS, "not json"),
            rec(TRIPLE_CLASS, r#"{"aspect":"天气","opinion":"下雨","sentiment":"neutral"}"#),
            rec(TRIPLE_CLASS, r#"["just a string", {}]"#),
            rec("shop_name", "老王烧烤"),
            rec(TRIPLE_CLASS, r#"{"aspect":"服务","opinion":"服务员热情","sentiment":"maybe"}"#),
        ];
        let triples = parse_triple_records(&records, &catalog);
        assert_eq!(triples.len(), 1);
        assert_eq!(triples[0].aspect, "服务");
        assert_eq!(triples[0].sub_aspect, "服务人员态度");
        assert_eq!(triples[0].sentiment, Sentiment::Neutral);
    }

    #[test]
    fn test_metadata_records() {
        let records = vec![
            rec(SHOP_CLASS, "小南面馆"),
            rec(RATING_CLASS, "4分"),
            rec(DATE_CLASS, "\"2024-05-01\""),
            rec(FOCUS_CLASS, "价格"),
            rec(TAGS_CLASS, "便宜，分量足; 便宜"),
            rec(SENTIMENT_CLASS, "positive"),
        ];
        let md = parse_metadata_records(&records);
        assert_eq!(md.shop.as_deref(), Some("小南面馆"));
        assert_eq!(md.rating.as_deref(), Some("4"));
        assert_eq!(md.date.as_deref(), Some("2024-05-01"));
        assert_eq!(md.focus, Some(Focus::Price));
        assert_eq!(md.tags, Some(vec!["便宜".to_string(), "分量足".into(), "便宜".into()]));
        assert_eq!(md.sentiment, Some(Sentiment::Positive));
        assert!(md.missing_fields().is_empty());
    }

    #[test]
    fn test_metadata_placeholders_stay_unset() {
        let records = vec![
            rec(SHOP_CLASS, "未知"),
            rec(RATING_CLASS, "Unknown"),
            rec(FOCUS_CLASS, "氛围"),
            rec(TAGS_CLASS, " , ；"),
            rec(SENTIMENT_CLASS, ""),
        ];
        let md = parse_metadata_records(&records);
        assert!(md.is_empty());
    }

    #[test]
    fn test_rating_without_digit_keeps_text() {
        let md = parse_metadata_records(&[rec(RATING_CLASS, "五星")]);
        assert_eq!(md.rating.as_deref(), Some("五星"));
        let md = parse_metadata_records(&[rec(RATING_CLASS, "５星")]);
        assert_eq!(md.rating.as_deref(), Some("5"));
    }
}
