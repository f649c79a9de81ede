//! Aspect taxonomy: category → sub-aspect → trigger keywords.
//!
//! Matching is case-sensitive substring containment. Iteration order is the
//! declared order, and every tie-break in the extraction pipeline depends on
//! it, so entries are kept in `Vec`s rather than maps.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Declared restaurant taxonomy. Six categories, each with ordered sub-aspects.
const RESTAURANT_TAXONOMY: &[(&str, &[(&str, &[&str])])] = &[
    ("位置", &[
        ("交通是否便利", &["地铁", "公交", "交通", "步行", "接驳", "出站"]),
        ("距离商圈远近", &["商圈", "远", "离商圈", "距离"]),
        ("是否容易寻找", &["门牌", "巷子", "不好找", "入口", "招牌"]),
    ]),
    ("服务", &[
        ("排队等候时间", &["排队", "等位", "等待", "候位"]),
        ("服务人员态度", &["服务员", "态度", "热情", "冷淡", "礼貌"]),
        ("是否容易停车", &["停车", "停车位", "泊车"]),
        ("点菜/上菜速度", &["上菜", "上桌", "上菜速度", "上菜慢"]),
    ]),
    ("价格", &[
        ("价格水平", &["价格", "价位", "贵", "便宜"]),
        ("性价比", &["性价比", "划算", "不划算"]),
        ("折扣力度", &["折扣", "满减", "优惠", "活动"]),
    ]),
    ("环境", &[
        ("装修情况", &["装修", "风格", "布置", "设计"]),
        ("嘈杂情况", &["嘈杂", "安静", "吵", "噪音", "音乐"]),
        ("就餐空间", &["座位", "空间", "拥挤", "桌间距"]),
        ("卫生情况", &["卫生", "干净", "脏", "油渍", "异味"]),
    ]),
    ("菜品", &[
        ("分量", &["分量", "份量", "量", "很足", "太少"]),
        ("口感", &["口感", "鲜嫩", "多汁", "偏咸", "味道"]),
        ("外观", &["外观", "颜值", "摆盘"]),
        ("推荐程度", &["推荐", "强烈推荐", "值得"]),
    ]),
    ("其他", &[
        ("本次消费感受", &["体验", "感受", "体验感"]),
        ("再次消费的意愿", &["还会来", "不会再来", "会再来", "回访"]),
    ]),
];

/// A sub-aspect label and its ordered trigger keywords.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubAspectEntry {
    pub name: String,
    pub keywords: Vec<String>,
}

impl SubAspectEntry {
    /// Number of distinct keywords of this sub-aspect present in `text`.
    pub fn hit_count(&self, text: &str) -> usize {
        self.keywords.iter().filter(|kw| text.contains(kw.as_str())).count()
    }
}

/// A top-level aspect category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectEntry {
    pub name: String,
    pub sub_aspects: Vec<SubAspectEntry>,
}

impl AspectEntry {
    /// True if any keyword of any sub-aspect occurs in `text`.
    pub fn matches(&self, text: &str) -> bool {
        self.keywords().any(|kw| text.contains(kw))
    }

    /// All keywords in declared order (sub-aspect order, then keyword order).
    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.sub_aspects
            .iter()
            .flat_map(|sub| sub.keywords.iter().map(String::as_str))
    }

    /// First keyword in declared order that occurs in `text`.
    ///
    /// This is catalog order, not leftmost position in the text.
    pub fn first_keyword_in(&self, text: &str) -> Option<&str> {
        self.keywords().find(|kw| text.contains(kw))
    }
}

/// Read-only aspect taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectCatalog {
    aspects: Vec<AspectEntry>,
}

impl AspectCatalog {
    /// The built-in restaurant review taxonomy.
    pub fn restaurant() -> Self {
        let aspects = RESTAURANT_TAXONOMY
            .iter()
            .map(|(name, subs)| AspectEntry {
                name: (*name).to_string(),
                sub_aspects: subs
                    .iter()
                    .map(|(sub, kws)| SubAspectEntry {
                        name: (*sub).to_string(),
                        keywords: kws.iter().map(|k| (*k).to_string()).collect(),
                    })
                    .collect(),
            })
            .collect();
        Self { aspects }
    }

    /// Build a catalog from custom entries.
    ///
    /// Rejects empty names, empty keywords and duplicate aspect names.
    pub fn from_entries(aspects: Vec<AspectEntry>) -> Result<Self> {
        let mut seen: Vec<&str> = Vec::new();
        for aspect in &aspects {
            if aspect.name.trim().is_empty() {
                return Err(Error::Config("aspect name must not be empty".into()));
            }
            if seen.contains(&aspect.name.as_str()) {
                return Err(Error::Config(format!("duplicate aspect: {}", aspect.name)));
            }
            seen.push(&aspect.name);
            for sub in &aspect.sub_aspects {
                if sub.name.trim().is_empty() || sub.keywords.iter().any(|k| k.is_empty()) {
                    return Err(Error::Config(format!(
                        "aspect {} has an empty sub-aspect name or keyword",
                        aspect.name
                    )));
                }
            }
        }
        Ok(Self { aspects })
    }

    /// Parse a catalog from JSON: `[{"name": .., "sub_aspects": [{"name": .., "keywords": [..]}]}]`.
    pub fn from_json(json: &str) -> Result<Self> {
        let aspects: Vec<AspectEntry> = serde_json::from_str(json)?;
        Self::from_entries(aspects)
    }

    pub fn aspects(&self) -> &[AspectEntry] {
        &self.aspects
    }

    pub fn aspect(&self, name: &str) -> Option<&AspectEntry> {
        self.aspects.iter().find(|a| a.name == name)
    }

    pub fn contains_aspect(&self, name: &str) -> bool {
        self.aspect(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.aspects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aspects.is_empty()
    }

    /// Aspects with at least one keyword hit in `text`, in catalog order.
    pub fn aspects_in<'a>(&'a self, text: &'a str) -> impl Iterator<Item = &'a AspectEntry> + 'a {
        self.aspects.iter().filter(move |a| a.matches(text))
    }

    /// Infer the most likely sub-aspect label for `text`.
    ///
    /// With a known `aspect_hint`, only that aspect's sub-aspects compete
    /// first; if none of them hits, every sub-aspect of every aspect
    /// competes. The winner has the most distinct keyword hits, ties going
    /// to the earlier declared sub-aspect. Returns `""` when nothing hits.
    ///
    /// Scoring is count-based and ignores where keywords sit in the text, so
    /// the winner is not necessarily the sub-aspect whose keyword made the
    /// aspect match in the first place.
    pub fn infer_sub_aspect(&self, text: &str, aspect_hint: Option<&str>) -> &str {
        if text.is_empty() {
            return "";
        }
        if let Some(aspect) = aspect_hint.and_then(|h| self.aspect(h)) {
            if let Some(best) = best_sub_aspect(aspect.sub_aspects.iter(), text) {
                return best;
            }
        }
        best_sub_aspect(self.aspects.iter().flat_map(|a| a.sub_aspects.iter()), text)
            .unwrap_or("")
    }
}

impl Default for AspectCatalog {
    fn default() -> Self {
        Self::restaurant()
    }
}

/// Highest hit count wins; strict `>` keeps the first declared on ties.
fn best_sub_aspect<'a>(
    subs: impl Iterator<Item = &'a SubAspectEntry>,
    text: &str,
) -> Option<&'a str> {
    let mut best: Option<(&str, usize)> = None;
    for sub in subs {
        let count = sub.hit_count(text);
        if count == 0 {
            continue;
        }
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((sub.name.as_str(), count)),
        }
    }
    best.map(|(name, _)| name)
}
