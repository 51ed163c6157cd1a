//! LLM-backed concept graph generator.

use async_trait::async_trait;
use learnpath_graph::{GraphGenerator, parse_generator_output};
use serde_json::Value;
use std::sync::Arc;

use crate::Result;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::prompts::{GRAPH_SYSTEM_PROMPT, graph_prompt};

/// Asks an [`LlmProvider`] for a knowledge graph about a topic.
///
/// Returns the raw JSON; shape checking happens in the graph cache.
pub struct LlmGraphGenerator {
    provider: Arc<dyn LlmProvider>,
    max_tokens: u32,
}

impl LlmGraphGenerator {
    /// Create a generator over a provider.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            provider,
            max_tokens: 8192,
        }
    }

    /// Override the response token budget.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl GraphGenerator for LlmGraphGenerator {
    async fn generate(&self, topic: &str) -> Result<Value> {
        let request = CompletionRequest::prompt(graph_prompt(topic))
            .with_system_prompt(GRAPH_SYSTEM_PROMPT)
            .with_max_tokens(self.max_tokens)
            .with_json_output();

        let response = self.provider.complete(request).await?;
        tracing::debug!(
            topic,
            tokens = response.tokens_used.total(),
            "received generated graph"
        );
        parse_generator_output(&response.content)
    }

    fn name(&self) -> &str {
        self.provider.name()
    }
}
