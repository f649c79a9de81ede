//! ReviewEngine: coordinates extraction, indexing and recall.

use std::sync::Arc;

use savor_adapter::{invoke, AdapterOutcome, ExampleData, ExtractionAdapter, ExtractionRequest};
use savor_core::{
    AspectCatalog, Capabilities, DocumentMetadata, ExtractionSettings, IndexedDocument,
    OpinionTriple, ReviewDocument, SentimentLexicon, TripleExtraction,
};
use savor_extract::{extract_metadata, parse_metadata_records, parse_triple_records, TripleBuilder};
use savor_resolve::{FilterPlanner, FilterSpec, RetrievalIndex};
use tracing::{debug, info};

use crate::observer::{ExtractionEvent, ExtractionObserver, TracingObserver};
use crate::prompts::{metadata_examples, triple_examples, METADATA_TASK, TRIPLE_TASK};
use crate::types::*;

/// Top-level engine.
///
/// The adapter is never stored: callers pass it to each extraction call, so
/// the same engine serves rule-based and model-assisted hosts. Extraction
/// takes `&self` and carries no state between documents.
pub struct ReviewEngine {
    catalog: AspectCatalog,
    lexicon: SentimentLexicon,
    planner: FilterPlanner,
    index: RetrievalIndex,
    settings: ExtractionSettings,
    observer: Arc<dyn ExtractionObserver>,
    triple_examples: Vec<ExampleData>,
    metadata_examples: Vec<ExampleData>,
}

impl ReviewEngine {
    /// Engine with the restaurant catalog, default lexicon and shop gazetteer.
    pub fn new() -> Self {
        let catalog = AspectCatalog::restaurant();
        info!("Review engine initialized: {} aspects", catalog.len());
        Self {
            catalog,
            lexicon: SentimentLexicon::restaurant(),
            planner: FilterPlanner::default(),
            index: RetrievalIndex::new(),
            settings: ExtractionSettings::default(),
            observer: Arc::new(TracingObserver),
            triple_examples: triple_examples(),
            metadata_examples: metadata_examples(),
        }
    }

    pub fn with_catalog(mut self, catalog: AspectCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn with_lexicon(mut self, lexicon: SentimentLexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_planner(mut self, planner: FilterPlanner) -> Self {
        self.planner = planner;
        self
    }

    pub fn with_settings(mut self, settings: ExtractionSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_observer(mut self, observer: Arc<dyn ExtractionObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn catalog(&self) -> &AspectCatalog {
        &self.catalog
    }

    pub fn settings(&self) -> ExtractionSettings {
        self.settings
    }

    pub fn index(&self) -> &RetrievalIndex {
        &self.index
    }

    /// Extract opinion triples from each document.
    ///
    /// Every document yields exactly one result. Adapter failures fall back
    /// to the rule-based path for that document only.
    pub fn extract_triples(
        &self,
        documents: &[ReviewDocument],
        adapter: Option<&dyn ExtractionAdapter>,
    ) -> Vec<TripleExtraction> {
        documents
            .iter()
            .map(|doc| self.document_triples(doc, adapter))
            .collect()
    }

    fn document_triples(
        &self,
        doc: &ReviewDocument,
        adapter: Option<&dyn ExtractionAdapter>,
    ) -> TripleExtraction {
        let request = ExtractionRequest {
            text: &doc.content,
            task: TRIPLE_TASK,
            examples: &self.triple_examples,
            passes: self.settings.extraction_passes,
        };

        let (triples, method, reason) = match invoke(self.usable(adapter), &request) {
            AdapterOutcome::Extracted(result) => {
                let triples = parse_triple_records(&result.extractions, &self.catalog);
                (triples, ExtractionMethod::Model, None)
            }
            AdapterOutcome::Unavailable => (
                self.rule_based_triples(&doc.content),
                ExtractionMethod::RuleBased,
                Some(self.unavailable_reason(adapter)),
            ),
            AdapterOutcome::Failed(e) => (
                self.rule_based_triples(&doc.content),
                ExtractionMethod::RuleBased,
                Some(format!("adapter call failed: {}", e)),
            ),
        };

        self.emit(&doc.id, Stage::Triples, method, reason);
        TripleExtraction {
            id: doc.id.clone(),
            triples,
            used_model: method == ExtractionMethod::Model,
        }
    }

    fn rule_based_triples(&self, content: &str) -> Vec<OpinionTriple> {
        TripleBuilder::new(&self.catalog, &self.lexicon).build(content)
    }

    /// Derive metadata for each document, pairing it with its source.
    ///
    /// Adapter fields that come back missing or as placeholders are
    /// backfilled one by one from the rule-based result.
    pub fn extract_metadata(
        &self,
        documents: &[ReviewDocument],
        adapter: Option<&dyn ExtractionAdapter>,
    ) -> Vec<IndexedDocument> {
        documents
            .iter()
            .map(|doc| IndexedDocument::new(doc.clone(), self.document_metadata(doc, adapter)))
            .collect()
    }

    fn document_metadata(
        &self,
        doc: &ReviewDocument,
        adapter: Option<&dyn ExtractionAdapter>,
    ) -> DocumentMetadata {
        let request = ExtractionRequest {
            text: &doc.content,
            task: METADATA_TASK,
            examples: &self.metadata_examples,
            passes: self.settings.extraction_passes,
        };

        let (metadata, method, reason) = match invoke(self.usable(adapter), &request) {
            AdapterOutcome::Extracted(result) => {
                let partial = parse_metadata_records(&result.extractions);
                let missing = partial.missing_fields();
                let reason = (!missing.is_empty()).then(|| format!("backfilled: {}", missing.join(",")));
                let metadata = partial.backfill(extract_metadata(doc));
                (metadata, ExtractionMethod::Model, reason)
            }
            AdapterOutcome::Unavailable => (
                extract_metadata(doc),
                ExtractionMethod::RuleBased,
                Some(self.unavailable_reason(adapter)),
            ),
            AdapterOutcome::Failed(e) => (
                extract_metadata(doc),
                ExtractionMethod::RuleBased,
                Some(format!("adapter call failed: {}", e)),
            ),
        };

        self.emit(&doc.id, Stage::Metadata, method, reason);
        metadata
    }

    /// Extract metadata and replace the index contents with the result.
    ///
    /// Returns the number of indexed documents.
    pub fn ingest(
        &mut self,
        documents: &[ReviewDocument],
        adapter: Option<&dyn ExtractionAdapter>,
    ) -> usize {
        let indexed = self.extract_metadata(documents, adapter);
        self.index.add(indexed);
        self.index.len()
    }

    /// Translate a free-text query into filters.
    pub fn plan(&self, query: &str) -> FilterSpec {
        self.planner.plan(query)
    }

    pub fn search(&self, query: &str, filters: Option<&FilterSpec>) -> Vec<&IndexedDocument> {
        self.index.search(query, filters)
    }

    /// Plan filters for `query`, then search with and without them.
    pub fn recall(&self, query: &str) -> RecallResult<'_> {
        let filters = self.plan(query);
        let documents = self.index.search(query, Some(&filters));
        let unfiltered = self.index.search(query, None);
        debug!(
            "Recall {:?}: {} filtered, {} unfiltered",
            query,
            documents.len(),
            unfiltered.len()
        );
        RecallResult {
            query: query.to_string(),
            filters,
            documents,
            unfiltered,
        }
    }

    /// Current status, given the adapter the host would pass to calls.
    pub fn status(&self, adapter: Option<&dyn ExtractionAdapter>) -> RuntimeStatus {
        let usable = self.usable(adapter);
        RuntimeStatus {
            mode: Capabilities::discover(usable.is_some()).mode,
            adapter_model: usable.map(|a| a.model_id().to_string()),
            indexed_documents: self.index.len(),
            catalog_aspects: self.catalog.len(),
            extraction_passes: self.settings.extraction_passes,
        }
    }

    fn usable<'a>(
        &self,
        adapter: Option<&'a dyn ExtractionAdapter>,
    ) -> Option<&'a dyn ExtractionAdapter> {
        adapter.filter(|_| self.settings.use_model)
    }

    fn unavailable_reason(&self, adapter: Option<&dyn ExtractionAdapter>) -> String {
        if adapter.is_some() {
            "model disabled by settings".into()
        } else {
            "adapter unavailable".into()
        }
    }

    fn emit(&self, doc_id: &str, stage: Stage, method: ExtractionMethod, reason: Option<String>) {
        self.observer.on_extraction(&ExtractionEvent {
            doc_id: doc_id.to_string(),
            stage,
            method,
            reason,
        });
    }
}

impl Default for ReviewEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use savor_core::{ExtractionMode, Sentiment};

    use crate::observer::CollectingObserver;

    fn engine_with_observer() -> (ReviewEngine, Arc<CollectingObserver>) {
        let observer = Arc::new(CollectingObserver::new());
        let engine = ReviewEngine::new().with_observer(observer.clone());
        (engine, observer)
    }

    #[test]
    fn test_rule_based_triples_without_adapter() {
        let (engine, observer) = engine_with_observer();
        let docs = vec![ReviewDocument::new("rev_001", "服务员态度冷淡，上菜慢。")];
        let results = engine.extract_triples(&docs, None);
        assert_eq!(results.len(), 1);
        assert!(!results[0].used_model);
        assert_eq!(results[0].triples.len(), 1);
        assert_eq!(results[0].triples[0].sentiment, Sentiment::Negative);

        let events = observer.take();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].method, ExtractionMethod::RuleBased);
        assert_eq!(events[0].reason.as_deref(), Some("adapter unavailable"));
    }

    #[test]
    fn test_status_rule_based() {
        let mut engine = ReviewEngine::new();
        engine.ingest(&[ReviewDocument::new("a", "味道不错")], None);
        let status = engine.status(None);
        assert_eq!(status.mode, ExtractionMode::RuleBased);
        assert_eq!(status.indexed_documents, 1);
        assert_eq!(status.catalog_aspects, 6);
        assert_eq!(status.adapter_model, None);
    }

    #[test]
    fn test_metadata_pairs_document() {
        let engine = ReviewEngine::new();
        let docs = vec![ReviewDocument::new("a", "店名：老王烧烤\n5星").with_title("老王烧烤 - 好吃")];
        let indexed = engine.extract_metadata(&docs, None);
        assert_eq!(indexed[0].document, docs[0]);
        assert_eq!(indexed[0].metadata.shop, "老王烧烤");
        assert_eq!(indexed[0].metadata.rating, "5");
    }

    #[test]
    fn test_recall_plans_filters() {
        let mut engine = ReviewEngine::new();
        engine.ingest(
            &[
                ReviewDocument::new("a", "店名：老王烧烤\n评分：5星\n老王家的串很好吃"),
                ReviewDocument::new("b", "店名：小南面馆\n评分：3星\n老王推荐来的，面一般"),
            ],
            None,
        );
        let recall = engine.recall("老王 至少4星");
        assert_eq!(recall.filters.shop.as_deref(), Some("老王烧烤"));
        assert_eq!(recall.filters.rating.as_deref(), Some("4"));
        let filtered: Vec<&str> = recall.documents.iter().map(|d| d.id()).collect();
        let unfiltered: Vec<&str> = recall.unfiltered.iter().map(|d| d.id()).collect();
        assert_eq!(filtered, vec!["a"]);
        assert_eq!(unfiltered, vec!["a", "b"]);
    }
}
