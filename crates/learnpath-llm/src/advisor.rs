//! Alternate learning path suggested by a model.
//!
//! The deterministic path builder is the primary answer; the advisor asks a
//! model for its own ordering and keeps only names that exist in the graph
//! and that the learner does not already know.

use learnpath_graph::{ConceptGraph, LearningPath, parse_generator_output};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::Result;
use crate::llm::{CompletionRequest, LlmProvider};
use crate::prompts::{PATH_SYSTEM_PROMPT, path_prompt};

/// Suggests learning paths using an [`LlmProvider`].
pub struct PathAdvisor {
    provider: Arc<dyn LlmProvider>,
}

impl PathAdvisor {
    /// Create an advisor over a provider.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Ask the model for a path towards `goal`.
    ///
    /// # Errors
    ///
    /// Provider failures are returned unchanged. A reply that is not JSON
    /// is [`Error::MalformedRawStructure`](crate::Error::MalformedRawStructure).
    pub async fn suggest(
        &self,
        goal: &str,
        known: &HashSet<String>,
        struggling: &[String],
        graph: &ConceptGraph,
    ) -> Result<LearningPath> {
        let request = CompletionRequest::prompt(path_prompt(goal, known, struggling, graph))
            .with_system_prompt(PATH_SYSTEM_PROMPT)
            .with_json_output();
        let response = self.provider.complete(request).await?;
        let reply = parse_generator_output(&response.content)?;

        let suggested = extract_path(&reply);
        let path: LearningPath = suggested
            .into_iter()
            .filter(|c| graph.contains(c) && !known.contains(c))
            .collect();

        tracing::debug!(
            provider = self.provider.name(),
            len = path.len(),
            "model suggested path"
        );
        Ok(path)
    }
}

/// Pull concept names out of a `{"path": ...}` reply.
///
/// `path` may be an array, a JSON-encoded array inside a string, or a single
/// bare name. Anything else yields no names.
pub fn extract_path(reply: &Value) -> Vec<String> {
    match reply.get("path") {
        Some(Value::Array(items)) => strings(items),
        Some(Value::String(text)) => match serde_json::from_str::<Value>(text) {
            Ok(Value::Array(items)) => strings(&items),
            _ => vec![text.clone()],
        },
        Some(other) => {
            tracing::warn!("ignoring non-list path in model reply: {other}");
            Vec::new()
        }
        None => Vec::new(),
    }
}

fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect()
}
