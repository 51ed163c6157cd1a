//! Shared application state.

use learnpath_graph::{ConceptGraph, GraphCache, GraphGenerator};
use learnpath_llm::{ChatAssistant, LlmGraphGenerator, LlmProvider, PathAdvisor};
use std::sync::Arc;

/// State injected into every handler.
///
/// The LLM-backed services are optional; without them the corresponding
/// routes answer 503 while path building keeps working.
#[derive(Clone)]
pub struct AppState {
    pub(crate) default_graph: Arc<ConceptGraph>,
    pub(crate) cache: Arc<GraphCache>,
    pub(crate) generator: Option<Arc<dyn GraphGenerator>>,
    pub(crate) advisor: Option<Arc<PathAdvisor>>,
    pub(crate) chat: Option<Arc<ChatAssistant>>,
}

impl AppState {
    /// State with a default graph and a cache, no LLM features.
    pub fn new(default_graph: impl Into<Arc<ConceptGraph>>, cache: GraphCache) -> Self {
        Self {
            default_graph: default_graph.into(),
            cache: Arc::new(cache),
            generator: None,
            advisor: None,
            chat: None,
        }
    }

    /// Enable graph generation, path advice, and chat over one provider.
    pub fn with_provider(mut self, provider: Arc<dyn LlmProvider>) -> Self {
        let generator: Arc<dyn GraphGenerator> =
            Arc::new(LlmGraphGenerator::new(Arc::clone(&provider)));
        self.generator = Some(generator);
        self.advisor = Some(Arc::new(PathAdvisor::new(Arc::clone(&provider))));
        self.chat = Some(Arc::new(ChatAssistant::new(provider)));
        self
    }

    /// Replace the graph generator.
    pub fn with_generator(mut self, generator: Arc<dyn GraphGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// The graph used when a request names no topic or graph.
    pub fn default_graph(&self) -> &Arc<ConceptGraph> {
        &self.default_graph
    }

    /// The topic cache.
    pub fn cache(&self) -> &Arc<GraphCache> {
        &self.cache
    }

    /// Whether LLM-backed routes are available.
    pub fn has_provider(&self) -> bool {
        self.generator.is_some()
    }
}
