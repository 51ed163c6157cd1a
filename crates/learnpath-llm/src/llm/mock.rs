//! Mock LLM provider for testing.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider, StopReason, TokenUsage};
use crate::{Error, Result};

/// Mock LLM provider that returns canned responses.
///
/// Useful for testing without making actual API calls. Every request is
/// recorded so tests can inspect the prompts that were sent.
#[derive(Clone)]
pub struct MockLlmProvider {
    state: Arc<Mutex<MockState>>,
}

struct MockState {
    canned: Vec<String>,
    index: usize,
    failures_remaining: usize,
    failure_status: u16,
    requests: Vec<CompletionRequest>,
}

impl MockLlmProvider {
    /// Creates a new mock provider with canned responses.
    ///
    /// Responses are returned in order. After all responses are used,
    /// the provider cycles back to the first response.
    ///
    /// # Examples
    ///
    /// ```
    /// use learnpath_llm::llm::MockLlmProvider;
    ///
    /// let provider = MockLlmProvider::new(vec![
    ///     "First response".to_string(),
    ///     "Second response".to_string(),
    /// ]);
    /// ```
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                canned: responses,
                index: 0,
                failures_remaining: 0,
                failure_status: 503,
                requests: Vec::new(),
            })),
        }
    }

    /// Creates a mock provider with a single response.
    pub fn with_response(response: impl Into<String>) -> Self {
        Self::new(vec![response.into()])
    }

    /// Creates a mock provider that always fails with the given HTTP status.
    pub fn failing(status: u16) -> Self {
        let provider = Self::new(Vec::new());
        if let Ok(mut state) = provider.state.try_lock() {
            state.failures_remaining = usize::MAX;
            state.failure_status = status;
        }
        provider
    }

    /// Fail the next `count` calls with `status` before answering.
    pub fn fail_first(self, count: usize, status: u16) -> Self {
        if let Ok(mut state) = self.state.try_lock() {
            state.failures_remaining = count;
            state.failure_status = status;
        }
        self
    }

    /// Number of `complete` calls so far, failed ones included.
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.requests.len()
    }

    /// Requests received so far.
    pub async fn requests(&self) -> Vec<CompletionRequest> {
        self.state.lock().await.requests.clone()
    }
}

#[async_trait]
impl LlmProvider for MockLlmProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let mut state = self.state.lock().await;
        state.requests.push(request);

        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(Error::llm_status(
                state.failure_status,
                format!("mock failure ({})", state.failure_status),
            ));
        }

        if state.canned.is_empty() {
            return Err(Error::llm("mock provider has no canned responses"));
        }

        let content = state.canned[state.index].clone();
        state.index = (state.index + 1) % state.canned.len();

        Ok(CompletionResponse {
            content,
            tokens_used: TokenUsage {
                input: 10, // Mock values
                output: 20,
            },
            stop_reason: StopReason::EndTurn,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
