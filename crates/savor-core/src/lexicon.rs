//! Sentiment word lists and keyword-group helpers.

use serde::{Deserialize, Serialize};

const POSITIVE_WORDS: &[&str] = &[
    "好", "棒", "赞", "推荐", "满意", "喜欢", "不错", "鲜美", "到位", "超赞", "惊喜", "贴心", "热情",
];

const NEGATIVE_WORDS: &[&str] = &[
    "差", "失望", "不满", "不好", "太咸", "糟糕", "没味", "坑", "不推荐", "昂贵", "拥挤", "脏",
    "冷淡", "慢",
];

const NEGATION_WORDS: &[&str] = &["不", "没", "无", "没有", "并不", "并非", "非"];

const DEGREE_WORDS: &[&str] = &["很", "非常", "极其", "特别", "十分"];

/// Sentence-level sentiment vocabulary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentLexicon {
    pub positive: Vec<String>,
    pub negative: Vec<String>,
    /// Words that cancel a sentiment keyword when found just before it.
    pub negation: Vec<String>,
    /// Intensity adverbs.
    pub degree: Vec<String>,
}

impl SentimentLexicon {
    /// Built-in vocabulary for Chinese restaurant reviews.
    pub fn restaurant() -> Self {
        Self {
            positive: owned(POSITIVE_WORDS),
            negative: owned(NEGATIVE_WORDS),
            negation: owned(NEGATION_WORDS),
            degree: owned(DEGREE_WORDS),
        }
    }
}

impl Default for SentimentLexicon {
    fn default() -> Self {
        Self::restaurant()
    }
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| (*w).to_string()).collect()
}

/// Return the label of the first group with any keyword contained in `text`.
///
/// Groups are tested in slice order; the first hit wins regardless of how
/// many keywords later groups match.
pub fn first_matching_group<T: Copy>(text: &str, groups: &[(T, &[&str])]) -> Option<T> {
    groups
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|kw| text.contains(kw)))
        .map(|(label, _)| *label)
}
