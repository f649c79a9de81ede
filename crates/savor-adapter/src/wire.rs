//! Chat-completions wire format for structured extraction.
//!
//! Requests carry the task, the few-shot examples rendered as prior turns,
//! and the document. The model is asked to answer with a JSON object,
//! optionally inside a code fence:
//!
//! ```text
//! {"extractions":[{"extraction_class":"..","extraction_text":".."}]}
//! ```

use savor_core::ExtractionRecord;
use serde_json::{json, Value};
use tracing::debug;

use crate::adapter::{ExampleData, ExtractionRequest};
use crate::error::AdapterError;

const FORMAT_INSTRUCTIONS: &str = "只输出一个 JSON 对象，顶层键为 \"extractions\"，其值为数组；\
数组元素包含 \"extraction_class\" 与 \"extraction_text\" 两个字符串字段。不要输出其他文字。";

/// Render a request as chat messages.
pub fn build_messages(request: &ExtractionRequest<'_>) -> Vec<Value> {
    let mut messages = Vec::with_capacity(2 + request.examples.len() * 2);
    messages.push(json!({
        "role": "system",
        "content": format!("{}\n\n{}", request.task.trim(), FORMAT_INSTRUCTIONS),
    }));
    for example in request.examples {
        messages.push(json!({"role": "user", "content": example.text}));
        messages.push(json!({"role": "assistant", "content": render_example(example)}));
    }
    messages.push(json!({"role": "user", "content": request.text}));
    messages
}

fn render_example(example: &ExampleData) -> String {
    json!({ "extractions": example.extractions }).to_string()
}

/// Pull the assistant text out of a chat-completions response body.
pub fn completion_content(body: &Value) -> Result<&str, AdapterError> {
    body["choices"][0]["message"]["content"]
        .as_str()
        .ok_or_else(|| AdapterError::MalformedResponse("missing choices[0].message.content".into()))
}

/// Parse the model's answer into extraction records.
///
/// Accepts a bare or fenced JSON object. `extraction_text` may be a string
/// or an inline JSON value, which is re-encoded. Items without a class are
/// dropped.
pub fn parse_extractions(content: &str) -> Result<Vec<ExtractionRecord>, AdapterError> {
    let json_text = strip_fences(content);
    let parsed: Value = serde_json::from_str(json_text)?;
    let items = parsed["extractions"].as_array().ok_or_else(|| {
        AdapterError::MalformedResponse("response has no \"extractions\" array".into())
    })?;

    let mut records = Vec::with_capacity(items.len());
    for item in items {
        let Some(class) = item["extraction_class"].as_str() else {
            debug!("Dropping extraction without a class: {}", item);
            continue;
        };
        let text = match &item["extraction_text"] {
            Value::String(s) => s.clone(),
            Value::Null => String::new(),
            other => other.to_string(),
        };
        records.push(ExtractionRecord::new(class, text));
    }
    Ok(records)
}

/// The JSON object inside optional ``` fences and surrounding prose.
fn strip_fences(content: &str) -> &str {
    let trimmed = content.trim();
    match (trimmed.find('{'), trimmed.rfind('}')) {
        (Some(start), Some(end)) if end > start => &trimmed[start..=end],
        _ => trimmed,
    }
}
