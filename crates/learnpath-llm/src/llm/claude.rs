//! Claude API provider implementation.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider, StopReason, TokenUsage};
use crate::{Error, Result};

/// Default Anthropic API endpoint.
pub const CLAUDE_API_URL: &str = "https://api.anthropic.com";

/// Default Claude model.
pub const DEFAULT_CLAUDE_MODEL: &str = "claude-sonnet-4-20250514";

/// LLM provider using Anthropic's Claude API.
pub struct ClaudeProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl ClaudeProvider {
    /// Creates a new Claude provider.
    ///
    /// # Arguments
    ///
    /// * `api_key` - Anthropic API key
    /// * `model` - Model ID (e.g., "claude-sonnet-4-20250514")
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: CLAUDE_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Points the provider at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let mut body = json!({
            "model": self.model,
            "max_tokens": request.max_tokens,
            "messages": request.messages,
        });

        let mut system = request.system_prompt.clone().unwrap_or_default();
        if request.json_output {
            if !system.is_empty() {
                system.push_str("\n\n");
            }
            system.push_str("Respond with a single JSON value and nothing else.");
        }
        if !system.is_empty() {
            body["system"] = json!(system);
        }

        body
    }
}

#[async_trait]
impl LlmProvider for ClaudeProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.request_body(&request);
        tracing::debug!(model = %self.model, "calling Claude messages API");

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::llm_with_source("Failed to call Claude API", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::llm_status(
                status.as_u16(),
                format!("Claude API error {status}: {error_text}"),
            ));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse Claude response: {e}")))?;

        let content = response_body["content"][0]["text"]
            .as_str()
            .ok_or_else(|| Error::llm("Missing content in Claude response"))?
            .to_string();

        let tokens_used = TokenUsage {
            input: response_body["usage"]["input_tokens"].as_u64().unwrap_or(0),
            output: response_body["usage"]["output_tokens"].as_u64().unwrap_or(0),
        };

        let stop_reason = match response_body["stop_reason"].as_str() {
            Some("end_turn") => StopReason::EndTurn,
            Some("max_tokens") => StopReason::MaxTokens,
            Some("stop_sequence") => StopReason::StopSequence,
            _ => StopReason::Other,
        };

        Ok(CompletionResponse {
            content,
            tokens_used,
            stop_reason,
        })
    }

    fn name(&self) -> &str {
        "claude"
    }
}
