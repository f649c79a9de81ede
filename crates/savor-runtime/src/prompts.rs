//! Task descriptions and few-shot examples sent to the extraction adapter.

use savor_adapter::ExampleData;
use savor_core::ExtractionRecord;
use savor_extract::records::{
    DATE_CLASS, FOCUS_CLASS, RATING_CLASS, SENTIMENT_CLASS, SHOP_CLASS, TAGS_CLASS, TRIPLE_CLASS,
};
use serde_json::json;

pub const TRIPLE_TASK: &str = "\
任务：从中文餐厅评论中抽取情感观点三元组。
每个三元组包含字段：
  - aspect（类别）：位置/服务/价格/环境/菜品/其他
  - sub_aspect（子维度，可选）：例如 交通是否便利、点菜/上菜速度 等
  - opinion（观点短语）：评论中的原文短语
  - sentiment（情感）：positive/negative/neutral
每条抽取的 extraction_class 固定为 \"opinion_triple\"，extraction_text 是包含上述字段的 JSON 字符串。";

pub const METADATA_TASK: &str = "\
从中文餐厅评论中提取以下字段：
1. shop_name：餐厅名称
2. rating：评分，仅返回数字，比如 \"5\" 或 \"3\"
3. review_date：评论日期，格式 YYYY-MM-DD（如能抽取）
4. review_focus：评论关注点，必须从 口味、环境、服务、价格 中选择最主要的一项
5. tags：评论中的标签列表，用逗号分隔（如 环境好，服务好）
6. sentiment：整体情感，positive/negative/neutral
只输出字段值，不要额外解释。";

/// (aspect, sub_aspect, opinion, sentiment)
type Triple<'a> = (&'a str, &'a str, &'a str, &'a str);

fn triple_example(text: &str, triples: &[Triple<'_>]) -> ExampleData {
    let extractions = triples
        .iter()
        .map(|(aspect, sub_aspect, opinion, sentiment)| {
            let payload = json!({
                "aspect": aspect,
                "sub_aspect": sub_aspect,
                "opinion": opinion,
                "sentiment": sentiment,
            });
            ExtractionRecord::new(TRIPLE_CLASS, payload.to_string())
        })
        .collect();
    ExampleData::new(text, extractions)
}

/// Few-shot examples covering every aspect category.
pub fn triple_examples() -> Vec<ExampleData> {
    vec![
        triple_example(
            "店名：老王烧烤\n评价：离地铁站步行5分钟，交通方便。羊肉串鲜嫩多汁，强烈推荐！",
            &[
                ("位置", "交通是否便利", "离地铁站步行5分钟", "positive"),
                ("菜品", "口感", "羊肉串鲜嫩多汁", "positive"),
                ("菜品", "推荐程度", "强烈推荐", "positive"),
            ],
        ),
        triple_example(
            "店名：巷里小馆\n评价：门牌不显眼，在巷子里不好找。服务员态度冷淡，排队等了40分钟。",
            &[
                ("位置", "是否容易寻找", "门牌不显眼，巷子里不好找", "negative"),
                ("服务", "服务人员态度", "服务员态度冷淡", "negative"),
                ("服务", "排队等候时间", "排队等了40分钟", "negative"),
            ],
        ),
        triple_example(
            "店名：海鲜一品\n评价：价格偏贵，不过周末有满减活动。装修很有设计感，就是音乐太吵。",
            &[
                ("价格", "价格水平", "价格偏贵", "negative"),
                ("价格", "折扣力度", "周末有满减活动", "positive"),
                ("环境", "装修情况", "装修很有设计感", "positive"),
                ("环境", "嘈杂情况", "音乐太吵", "negative"),
            ],
        ),
        triple_example(
            "店名：小南面馆\n评价：分量很足，性价比高。整体体验不错，还会再来。",
            &[
                ("菜品", "分量", "分量很足", "positive"),
                ("价格", "性价比", "性价比高", "positive"),
                ("其他", "本次消费感受", "整体体验不错", "positive"),
                ("其他", "再次消费的意愿", "还会再来", "positive"),
            ],
        ),
    ]
}

/// A single labelled review demonstrating every metadata class.
pub fn metadata_examples() -> Vec<ExampleData> {
    vec![ExampleData::new(
        "店名：示例店\n评分：5星\n时间：2024-01-01\n评价：味道很好，服务热情。标签：味道好, 服务好",
        vec![
            ExtractionRecord::new(SHOP_CLASS, "示例店"),
            ExtractionRecord::new(RATING_CLASS, "5"),
            ExtractionRecord::new(DATE_CLASS, "2024-01-01"),
            ExtractionRecord::new(FOCUS_CLASS, "口味"),
            ExtractionRecord::new(TAGS_CLASS, "味道好, 服务好"),
            ExtractionRecord::new(SENTIMENT_CLASS, "positive"),
        ],
    )]
}
