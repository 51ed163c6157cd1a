//! Gemini API provider implementation.

use async_trait::async_trait;
use serde_json::{Value, json};

use super::provider::{
    CompletionRequest, CompletionResponse, LlmProvider, Role, StopReason, TokenUsage,
};
use crate::{Error, Result};

/// Default Google generative language API endpoint.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default Gemini model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.0-flash";

/// LLM provider using Google's Gemini `generateContent` API.
pub struct GeminiProvider {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiProvider {
    /// Creates a new Gemini provider.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_URL.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Points the provider at a different API host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn request_body(&self, request: &CompletionRequest) -> Value {
        let contents: Vec<Value> = request
            .messages
            .iter()
            .map(|m| {
                let role = match m.role {
                    Role::User => "user",
                };
                json!({"role": role, "parts": [{"text": m.content}]})
            })
            .collect();

        let mut generation_config = json!({"maxOutputTokens": request.max_tokens});
        if request.json_output {
            generation_config["responseMimeType"] = json!("application/json");
        }

        let mut body = json!({
            "contents": contents,
            "generationConfig": generation_config,
        });
        if let Some(system) = &request.system_prompt {
            body["systemInstruction"] = json!({"parts": [{"text": system}]});
        }
        body
    }
}

#[async_trait]
impl LlmProvider for GeminiProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let body = self.request_body(&request);
        tracing::debug!(model = %self.model, "calling Gemini generateContent");

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::llm_with_source("Failed to call Gemini API", e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(Error::llm_status(
                status.as_u16(),
                format!("Gemini API error {status}: {error_text}"),
            ));
        }

        let response_body: Value = response
            .json()
            .await
            .map_err(|e| Error::llm(format!("Failed to parse Gemini response: {e}")))?;

        let candidate = &response_body["candidates"][0];
        let content = candidate["content"]["parts"][0]["text"]
            .as_str()
            .ok_or_else(|| Error::llm("Missing content in Gemini response"))?
            .to_string();

        let usage = &response_body["usageMetadata"];
        let tokens_used = TokenUsage {
            input: usage["promptTokenCount"].as_u64().unwrap_or(0),
            output: usage["candidatesTokenCount"].as_u64().unwrap_or(0),
        };

        let stop_reason = match candidate["finishReason"].as_str() {
            Some("STOP") => StopReason::EndTurn,
            Some("MAX_TOKENS") => StopReason::MaxTokens,
            Some("SAFETY") => StopReason::Safety,
            _ => StopReason::Other,
        };

        Ok(CompletionResponse {
            content,
            tokens_used,
            stop_reason,
        })
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::llm::{Message, RetryWrapper};
    use std::sync::Arc;
    use std::time::Duration;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_request_body_shape() {
        let provider = GeminiProvider::new("k", DEFAULT_GEMINI_MODEL);
        let request = CompletionRequest::new(vec![Message::user("question")])
            .with_system_prompt("sys")
            .with_json_output();

        let body = provider.request_body(&request);
        assert_eq!(body["contents"][0]["role"], "user");
        assert_eq!(body["contents"][0]["parts"][0]["text"], "question");
        assert!(body["generationConfig"].get("temperature").is_none());
        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "sys");
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
    }

    #[test]
    fn test_endpoint() {
        let provider = GeminiProvider::new("k", "gemini-x").with_base_url("http://localhost:1/");
        assert_eq!(
            provider.endpoint(),
            "http://localhost:1/v1beta/models/gemini-x:generateContent"
        );
    }

    #[tokio::test]
    async fn test_complete_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
            .and(header("x-goog-api-key", "secret"))
            .and(body_partial_json(json!({
                "generationConfig": {"responseMimeType": "application/json"}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": {"role": "model", "parts": [{"text": "{\"answer\": \"42\"}"}]},
                    "finishReason": "STOP"
                }],
                "usageMetadata": {"promptTokenCount": 3, "candidatesTokenCount": 4}
            })))
            .mount(&server)
            .await;

        let provider =
            GeminiProvider::new("secret", DEFAULT_GEMINI_MODEL).with_base_url(server.uri());
        let response = provider
            .complete(CompletionRequest::prompt("q").with_json_output())
            .await
            .unwrap();

        assert_eq!(response.content, "{\"answer\": \"42\"}");
        assert_eq!(response.tokens_used.total(), 7);
        assert_eq!(response.stop_reason, StopReason::EndTurn);
    }

    #[tokio::test]
    async fn test_missing_candidates_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"candidates": []})))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new("k", "m").with_base_url(server.uri());
        let err = provider
            .complete(CompletionRequest::prompt("q"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Llm { .. }));
        assert!(!err.is_retryable());
    }

    #[tokio::test]
    async fn test_undecodable_body_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .expect(1)
            .mount(&server)
            .await;

        let provider = GeminiProvider::new("k", "m").with_base_url(server.uri());
        let retry = RetryWrapper::new(Arc::new(provider))
            .with_max_attempts(3)
            .with_initial_delay(Duration::from_millis(1));
        let err = retry
            .complete(CompletionRequest::prompt("q"))
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Llm { .. }));
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("Failed to parse Gemini response"));
    }

    #[tokio::test]
    async fn test_client_error_not_retryable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_string("bad key"))
            .mount(&server)
            .await;

        let provider = GeminiProvider::new("k", "m").with_base_url(server.uri());
        let err = provider
            .complete(CompletionRequest::prompt("q"))
            .await
            .unwrap_err();
        assert!(!err.is_retryable());
        assert!(err.to_string().contains("400"));
    }
}
