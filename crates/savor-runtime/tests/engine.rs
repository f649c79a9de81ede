//! End-to-end engine behaviour: extraction, fallback, indexing and recall.

use std::sync::Arc;

use savor_adapter::{AdapterError, ExtractionAdapter, ExtractionRequest, ExtractionResult};
use savor_core::{
    AspectCatalog, DocumentMetadata, ExtractionMode, ExtractionRecord, ExtractionSettings, Focus,
    IndexedDocument, ReviewDocument, Sentiment,
};
use savor_extract::split_sentences;
use savor_resolve::{FilterSpec, RetrievalIndex};
use savor_runtime::{CollectingObserver, ExtractionMethod, ReviewEngine, Stage};

/// Adapter that answers every call with the same records.
struct CannedAdapter {
    records: Vec<ExtractionRecord>,
}

impl ExtractionAdapter for CannedAdapter {
    fn extract(&self, _: &ExtractionRequest<'_>) -> Result<ExtractionResult, AdapterError> {
        Ok(ExtractionResult {
            extractions: self.records.clone(),
        })
    }

    fn model_id(&self) -> &str {
        "canned"
    }
}

/// Adapter whose every call fails, like a bad key or a dropped connection.
struct FailingAdapter;

impl ExtractionAdapter for FailingAdapter {
    fn extract(&self, _: &ExtractionRequest<'_>) -> Result<ExtractionResult, AdapterError> {
        Err(AdapterError::Http("connection reset".into()))
    }

    fn model_id(&self) -> &str {
        "failing"
    }
}

fn sample_reviews() -> Vec<ReviewDocument> {
    vec![
        ReviewDocument::new(
            "rev_001",
            "店名：老王烧烤\n评分：5星\n时间：2024-03-15\n羊肉串鲜嫩多汁，味道很好。离地铁站步行5分钟，交通方便！服务员很热情。",
        )
        .with_title("老王烧烤 - 地道烤串"),
        ReviewDocument::new(
            "rev_002",
            "店名：小南面馆\n评分：3星\n服务员态度冷淡，上菜慢。面的分量很足，价格便宜。",
        ),
        ReviewDocument::new(
            "rev_003",
            "店名：绿茶餐厅\n评分：4星\n环境雅致，装修很有设计感，就是有点吵。标签：环境好，适合聚餐",
        ),
        ReviewDocument::new(
            "rev_004",
            "店名：海鲜一品\n评分：2星\n海鲜不新鲜，价格太贵，很失望。听说老王那边更好。",
        ),
    ]
}

fn collecting_engine() -> (ReviewEngine, Arc<CollectingObserver>) {
    let observer = Arc::new(CollectingObserver::new());
    (ReviewEngine::new().with_observer(observer.clone()), observer)
}

#[test]
fn test_triple_count_matches_aspects_per_sentence() {
    let engine = ReviewEngine::new();
    let catalog = AspectCatalog::restaurant();
    for result in engine.extract_triples(&sample_reviews(), None) {
        let doc = sample_reviews().into_iter().find(|d| d.id == result.id).unwrap();
        let sentences = split_sentences(&doc.content);
        let expected: usize = sentences.iter().map(|s| catalog.aspects_in(s).count()).sum();
        assert_eq!(result.triples.len(), expected, "doc {}", result.id);
        assert!(result.triples.len() <= sentences.len() * catalog.len());
        for triple in &result.triples {
            assert!(catalog.contains_aspect(&triple.aspect));
        }
    }
}

#[test]
fn test_staff_complaint_sentence() {
    let engine = ReviewEngine::new();
    let results = engine.extract_triples(&[ReviewDocument::new("p4", "服务员态度冷淡，上菜慢")], None);
    let triples = &results[0].triples;
    assert_eq!(triples.len(), 1);
    assert_eq!(triples[0].aspect, "服务");
    assert_eq!(triples[0].sentiment, Sentiment::Negative);
}

#[test]
fn test_extraction_is_idempotent() {
    let engine = ReviewEngine::new();
    let docs = sample_reviews();
    let first = serde_json::to_string(&engine.extract_triples(&docs, None)).unwrap();
    let second = serde_json::to_string(&engine.extract_triples(&docs, None)).unwrap();
    assert_eq!(first, second);

    let md_first = serde_json::to_string(&engine.extract_metadata(&docs, None)).unwrap();
    let md_second = serde_json::to_string(&engine.extract_metadata(&docs, None)).unwrap();
    assert_eq!(md_first, md_second);
}

#[test]
fn test_adapter_triples_are_used_as_returned() {
    let (engine, observer) = collecting_engine();
    let adapter = CannedAdapter {
        records: vec![
            ExtractionRecord::new(
                "opinion_triple",
                r#"{"aspect":"菜品","opinion":"羊肉串多汁","sentiment":"positive"}"#,
            ),
            ExtractionRecord::new("opinion_triple", "{broken"),
        ],
    };
    let results = engine.extract_triples(&sample_reviews()[..1], Some(&adapter));
    assert!(results[0].used_model);
    assert_eq!(results[0].triples.len(), 1);
    assert_eq!(results[0].triples[0].sub_aspect, "口感");

    let events = observer.take();
    assert_eq!(events[0].method, ExtractionMethod::Model);
    assert_eq!(events[0].stage, Stage::Triples);
}

#[test]
fn test_failing_adapter_falls_back_per_document() {
    let (engine, observer) = collecting_engine();
    let docs = sample_reviews();
    let with_failure = engine.extract_triples(&docs, Some(&FailingAdapter));
    let rule_based = engine.extract_triples(&docs, None);

    assert_eq!(with_failure.len(), docs.len());
    assert!(with_failure.iter().all(|r| !r.used_model));
    assert_eq!(with_failure, rule_based);

    let events = observer.take();
    assert!(events[0]
        .reason
        .as_deref()
        .unwrap()
        .starts_with("adapter call failed"));
}

#[test]
fn test_use_model_switch_skips_adapter() {
    let (engine, observer) = collecting_engine();
    let engine = engine.with_settings(ExtractionSettings::rule_based_only());
    let adapter = CannedAdapter { records: vec![] };
    let results = engine.extract_triples(&sample_reviews()[..1], Some(&adapter));
    assert!(!results[0].used_model);
    assert!(!results[0].triples.is_empty());
    assert_eq!(
        observer.take()[0].reason.as_deref(),
        Some("model disabled by settings")
    );
    assert_eq!(engine.status(Some(&adapter)).mode, ExtractionMode::RuleBased);
}

#[test]
fn test_metadata_backfill_keeps_model_fields() {
    let (engine, observer) = collecting_engine();
    let adapter = CannedAdapter {
        records: vec![
            ExtractionRecord::new("shop_name", "老王烧烤总店"),
            ExtractionRecord::new("rating", "unknown"),
            ExtractionRecord::new("review_focus", "服务"),
        ],
    };
    let indexed = engine.extract_metadata(&sample_reviews()[..1], Some(&adapter));
    let md = &indexed[0].metadata;
    assert_eq!(md.shop, "老王烧烤总店");
    assert_eq!(md.focus, Focus::Service);
    // Backfilled from the rule-based path.
    assert_eq!(md.rating, "5");
    assert_eq!(md.date, "2024-03-15");

    let events = observer.take();
    assert_eq!(events[0].method, ExtractionMethod::Model);
    assert_eq!(
        events[0].reason.as_deref(),
        Some("backfilled: rating,date,tags,sentiment")
    );
    assert_eq!(engine.status(Some(&adapter)).mode, ExtractionMode::ModelAssisted);
}

#[test]
fn test_unfiltered_search_is_substring_or() {
    let mut engine = ReviewEngine::new();
    let docs = sample_reviews();
    engine.ingest(&docs, None);

    let hits: Vec<&str> = engine.search("老王", None).iter().map(|d| d.id()).collect();
    let expected: Vec<&str> = docs
        .iter()
        .filter(|d| d.content.contains("老王"))
        .map(|d| d.id.as_str())
        .collect();
    assert_eq!(hits, expected);
    assert_eq!(hits, vec!["rev_001", "rev_004"]);
}

fn indexed(rating: &str) -> IndexedDocument {
    IndexedDocument::new(
        ReviewDocument::new("laowang", "老王烧烤的烤串很香"),
        DocumentMetadata {
            shop: "老王烧烤".into(),
            rating: rating.into(),
            ..Default::default()
        },
    )
}

#[test]
fn test_rating_bound_filters_shop_match() {
    let filters = FilterSpec::default().with_shop("老王烧烤").with_rating("5");

    let mut index = RetrievalIndex::new();
    index.add(vec![indexed("5")]);
    assert_eq!(index.search("老王", Some(&filters)).len(), 1);

    index.add(vec![indexed("3")]);
    assert!(index.search("老王", Some(&filters)).is_empty());
}

#[test]
fn test_filtered_search_requires_query_token() {
    let filters = FilterSpec::default().with_shop("老王烧烤").with_rating("5");
    let mut index = RetrievalIndex::new();
    index.add(vec![indexed("5")]);
    assert!(index.search("海鲜 拼盘", Some(&filters)).is_empty());
}

#[test]
fn test_recall_contrasts_filtered_and_unfiltered() {
    let mut engine = ReviewEngine::new();
    engine.ingest(&sample_reviews(), None);

    let recall = engine.recall("老王 好评");
    assert_eq!(recall.filters.shop.as_deref(), Some("老王烧烤"));
    assert_eq!(recall.filters.sentiment, Some(Sentiment::Positive));
    let filtered: Vec<&str> = recall.documents.iter().map(|d| d.id()).collect();
    let unfiltered: Vec<&str> = recall.unfiltered.iter().map(|d| d.id()).collect();
    assert_eq!(filtered, vec!["rev_001"]);
    assert_eq!(unfiltered, vec!["rev_001", "rev_004"]);

    let json = serde_json::to_value(&recall).unwrap();
    assert_eq!(json["filters"]["shop"], "老王烧烤");
    assert_eq!(json["documents"][0]["metadata"]["rating"], "5");
}

#[test]
fn test_reingest_replaces_index() {
    let mut engine = ReviewEngine::new();
    engine.ingest(&sample_reviews(), None);
    assert_eq!(engine.index().len(), 4);
    engine.ingest(&sample_reviews()[..1], None);
    assert_eq!(engine.status(None).indexed_documents, 1);
}

#[test]
fn test_full_width_rating_keeps_lower_bound() {
    let mut engine = ReviewEngine::new();
    engine.ingest(
        &[ReviewDocument::new("fw", "店名：老王烧烤\n评分：５星\n老王的串好吃")],
        None,
    );
    assert_eq!(engine.index().documents()[0].metadata.rating, "5");

    let bound = FilterSpec::default().with_rating("4");
    assert_eq!(engine.search("老王", Some(&bound)).len(), 1);

    let recall = engine.recall("至少４星 老王");
    assert_eq!(recall.filters.rating.as_deref(), Some("4"));
    assert_eq!(recall.documents.len(), 1);
}
