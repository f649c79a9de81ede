//! OpenAI-compatible chat-completions adapter (DashScope, OpenAI, vLLM, ...).

use std::time::Duration;

use reqwest::blocking::Client;
use savor_core::AdapterConfig;
use serde_json::{json, Value};
use tracing::debug;

use crate::adapter::{ExtractionAdapter, ExtractionRequest, ExtractionResult};
use crate::error::AdapterError;
use crate::wire::{build_messages, completion_content, parse_extractions};

pub struct OpenAiCompatAdapter {
    client: Client,
    endpoint: String,
    api_key: String,
    model_id: String,
}

impl OpenAiCompatAdapter {
    pub fn new(config: &AdapterConfig) -> Result<Self, AdapterError> {
        if config.api_key.trim().is_empty() {
            return Err(AdapterError::Unavailable("no API key configured".into()));
        }
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model_id: config.model_id.clone(),
        })
    }
}

impl ExtractionAdapter for OpenAiCompatAdapter {
    fn extract(&self, request: &ExtractionRequest<'_>) -> Result<ExtractionResult, AdapterError> {
        // One request per call; passes are not aggregated.
        let body = json!({
            "model": self.model_id,
            "messages": build_messages(request),
            "temperature": 0.0,
            "stream": false,
        });

        debug!(
            "Posting extraction to {} with model {} (passes={})",
            self.endpoint, self.model_id, request.passes
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: Value = response.json()?;
        let content = completion_content(&payload)?;
        let extractions = parse_extractions(content)?;
        debug!("Adapter returned {} records", extractions.len());
        Ok(ExtractionResult { extractions })
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
