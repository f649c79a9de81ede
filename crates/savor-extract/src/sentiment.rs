//! Sentence-level sentiment scoring.
//!
//! Counts distinct positive and negative keywords, cancels a keyword when a
//! negation word sits in the three characters before its first occurrence,
//! and doubles the positive count when any degree adverb is present. Only
//! the positive side is amplified.

use savor_core::{Sentiment, SentimentLexicon};

/// Characters inspected before a sentiment keyword for a negation word.
pub const NEGATION_WINDOW: usize = 3;

/// Raw polarity counts after negation and degree adjustment.
///
/// Counts are signed: a negated keyword subtracts one even when that takes
/// the side below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SentimentCounts {
    pub positive: i64,
    pub negative: i64,
}

impl SentimentCounts {
    pub fn sentiment(&self) -> Sentiment {
        Sentiment::from_counts(self.positive, self.negative)
    }
}

pub struct SentimentScorer<'a> {
    lexicon: &'a SentimentLexicon,
}

impl<'a> SentimentScorer<'a> {
    pub fn new(lexicon: &'a SentimentLexicon) -> Self {
        Self { lexicon }
    }

    pub fn score(&self, sentence: &str) -> Sentiment {
        self.counts(sentence).sentiment()
    }

    pub fn counts(&self, sentence: &str) -> SentimentCounts {
        let mut positive = self.side_count(sentence, &self.lexicon.positive);
        let negative = self.side_count(sentence, &self.lexicon.negative);

        if self.lexicon.degree.iter().any(|d| sentence.contains(d.as_str())) {
            positive *= 2;
        }

        SentimentCounts { positive, negative }
    }

    fn side_count(&self, sentence: &str, words: &[String]) -> i64 {
        let mut count = 0i64;
        for word in words {
            let Some(idx) = sentence.find(word.as_str()) else {
                continue;
            };
            count += 1;
            if self.negated_at(sentence, idx) {
                count -= 1;
            }
        }
        count
    }

    /// True if a negation word occurs in the window ending at byte `idx`.
    fn negated_at(&self, sentence: &str, idx: usize) -> bool {
        let window = chars_before(sentence, idx, NEGATION_WINDOW);
        !window.is_empty()
            && self
                .lexicon
                .negation
                .iter()
                .any(|n| window.contains(n.as_str()))
    }
}

/// The last `n` characters of `text[..idx]`, or all of it if shorter.
pub(crate) fn chars_before(text: &str, idx: usize, n: usize) -> &str {
    let prefix = &text[..idx];
    if n == 0 {
        return "";
    }
    let start = prefix
        .char_indices()
        .rev()
        .nth(n - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &prefix[start..]
}
