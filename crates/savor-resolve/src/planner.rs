//! Free-text query → `FilterSpec`.

use once_cell::sync::Lazy;
use regex::Regex;
use savor_core::{first_matching_group, normalize_rating, Focus, Sentiment};
use tracing::debug;

use crate::types::FilterSpec;

static RATING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"至少\s*([0-9０-９])\s*|([0-9０-９])\s*星|评分[:：]?\s*([0-9０-９])").unwrap());

/// Ordered focus buckets for queries.
pub const QUERY_FOCUS_GROUPS: &[(Focus, &[&str])] = &[
    (Focus::Taste, &["口味", "味道", "好吃", "难吃"]),
    (Focus::Environment, &["环境", "干净", "雅致", "嘈杂"]),
    (Focus::Service, &["服务", "上菜", "态度"]),
    (Focus::Price, &["价格", "贵", "便宜", "人均"]),
];

/// Approval phrases are tested before disapproval ones.
pub const QUERY_SENTIMENT_GROUPS: &[(Sentiment, &[&str])] = &[
    (Sentiment::Positive, &["好评", "推荐", "满意", "喜欢"]),
    (Sentiment::Negative, &["差评", "失望", "不满", "差"]),
];

/// A known shop: a short alias users type and the full indexed name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShopAlias {
    pub alias: String,
    pub name: String,
}

impl ShopAlias {
    pub fn new(alias: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            name: name.into(),
        }
    }
}

const DEFAULT_SHOPS: &[(&str, &str)] = &[
    ("老王", "老王烧烤"),
    ("小南", "小南面馆"),
    ("绿茶", "绿茶餐厅"),
    ("海鲜", "海鲜一品"),
];

/// Parses queries into filters using a shop gazetteer and keyword buckets.
#[derive(Debug, Clone)]
pub struct FilterPlanner {
    shops: Vec<ShopAlias>,
}

impl FilterPlanner {
    /// Planner with a custom shop gazetteer, tested in the given order.
    pub fn new(shops: Vec<ShopAlias>) -> Self {
        Self { shops }
    }

    pub fn shops(&self) -> &[ShopAlias] {
        &self.shops
    }

    /// Build a filter from `query`; dimensions without a match stay unset.
    pub fn plan(&self, query: &str) -> FilterSpec {
        let q = query.to_lowercase();
        let spec = FilterSpec {
            shop: self.plan_shop(&q),
            rating: plan_rating(&q),
            focus: first_matching_group(&q, QUERY_FOCUS_GROUPS),
            sentiment: first_matching_group(&q, QUERY_SENTIMENT_GROUPS),
        };
        debug!("Planned filters for {:?}: {:?}", query, spec);
        spec
    }

    fn plan_shop(&self, q: &str) -> Option<String> {
        self.shops
            .iter()
            .find(|s| q.contains(&s.alias.to_lowercase()) || q.contains(&s.name.to_lowercase()))
            .map(|s| s.name.clone())
    }
}

impl Default for FilterPlanner {
    fn default() -> Self {
        Self::new(
            DEFAULT_SHOPS
                .iter()
                .map(|(alias, name)| ShopAlias::new(*alias, *name))
                .collect(),
        )
    }
}

/// First non-empty capture among the "at least N", "N 星" and "评分 N" forms.
fn plan_rating(q: &str) -> Option<String> {
    let caps = RATING.captures(q)?;
    caps.iter()
        .skip(1)
        .flatten()
        .map(|m| m.as_str())
        .find(|s| !s.is_empty())
        .map(normalize_rating)
}
