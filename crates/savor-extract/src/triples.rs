//! Rule-based opinion triple extraction.

use savor_core::{AspectCatalog, OpinionTriple, SentimentLexicon};
use tracing::debug;

use crate::opinion::opinion_span;
use crate::segment::split_sentences;
use crate::sentiment::SentimentScorer;

/// Builds opinion triples sentence by sentence from the catalog and lexicon.
///
/// Stateless apart from the borrowed, read-only vocabularies: the same input
/// always produces the same output.
pub struct TripleBuilder<'a> {
    catalog: &'a AspectCatalog,
    scorer: SentimentScorer<'a>,
}

impl<'a> TripleBuilder<'a> {
    pub fn new(catalog: &'a AspectCatalog, lexicon: &'a SentimentLexicon) -> Self {
        Self {
            catalog,
            scorer: SentimentScorer::new(lexicon),
        }
    }

    /// Extract triples from a whole document.
    pub fn build(&self, content: &str) -> Vec<OpinionTriple> {
        let triples: Vec<OpinionTriple> = split_sentences(content)
            .into_iter()
            .flat_map(|sentence| self.build_sentence(sentence))
            .collect();
        debug!("Rule-based extraction produced {} triples", triples.len());
        triples
    }

    /// One triple per aspect found in `sentence`, in catalog order.
    ///
    /// Sentiment is scored once and shared by every triple of the sentence.
    pub fn build_sentence(&self, sentence: &str) -> Vec<OpinionTriple> {
        let found: Vec<_> = self.catalog.aspects_in(sentence).collect();
        if found.is_empty() {
            return Vec::new();
        }

        let sentiment = self.scorer.score(sentence);
        found
            .into_iter()
            .map(|aspect| OpinionTriple {
                aspect: aspect.name.clone(),
                sub_aspect: self
                    .catalog
                    .infer_sub_aspect(sentence, Some(&aspect.name))
                    .to_string(),
                opinion: opinion_span(sentence, aspect),
                sentiment,
            })
            .collect()
    }
}
