//! Route handlers.

use axum::Json;
use axum::extract::{Path, State};
use learnpath_core::Error;
use learnpath_graph::{ConceptGraph, LearningPath, normalize_raw, normalize_topic, recommend};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

type ApiResult<T> = Result<Json<T>, ApiError>;

// ============================================================================
// Request / response bodies
// ============================================================================

/// Body of `POST /generate_path` and `POST /suggest_path`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathRequest {
    /// Free-text goal.
    pub goal: String,
    /// Concepts the learner already knows.
    pub known_concepts: Vec<String>,
    /// Concepts to review, in priority order.
    pub struggling_concepts: Vec<String>,
    /// Topic whose cached graph should be used.
    pub topic: Option<String>,
    /// Inline graph, in any shape the normalizer accepts.
    pub knowledge_graph: Option<Value>,
}

/// Body returned by `POST /generate_path`.
#[derive(Debug, Serialize, Deserialize)]
pub struct PathResponse {
    /// Concepts to study, in order.
    pub path: LearningPath,
    /// Concept the goal resolved to.
    pub goal_concept: String,
    /// Known concepts as received, repeats dropped.
    pub known_concepts: Vec<String>,
    /// Struggling concepts as received, repeats dropped.
    pub struggling_concepts: Vec<String>,
}

/// Body returned by `POST /suggest_path`.
#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestResponse {
    /// Model-suggested concepts, filtered to the graph.
    pub path: LearningPath,
}

/// Body of `POST /generate_knowledge_graph`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GraphRequest {
    /// Topic to generate a graph for.
    pub topic: String,
}

/// Body returned by `POST /generate_knowledge_graph`.
#[derive(Debug, Serialize)]
pub struct GraphResponse {
    /// The (possibly cached) graph.
    pub knowledge_graph: Arc<ConceptGraph>,
}

/// Body returned by `DELETE /knowledge_graph/{topic}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct InvalidateResponse {
    /// Normalized topic key.
    pub topic: String,
    /// Whether an entry was removed.
    pub removed: bool,
}

/// Body of `POST /chat`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ChatRequest {
    /// The learner's question.
    pub question: String,
}

/// Body returned by `POST /chat`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    /// The model's answer.
    pub answer: String,
}

/// Body returned by `GET /health`.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"ok"`.
    pub status: String,
    /// Number of cached topic graphs.
    pub cached_topics: usize,
}

// ============================================================================
// Handlers
// ============================================================================

/// `POST /generate_path`
pub async fn generate_path(
    State(state): State<AppState>,
    Json(req): Json<PathRequest>,
) -> ApiResult<PathResponse> {
    let known_concepts = dedup(req.known_concepts);
    let struggling_concepts = dedup(req.struggling_concepts);
    let graph = select_graph(&state, req.topic.as_deref(), req.knowledge_graph).await?;

    let known: HashSet<String> = known_concepts.iter().cloned().collect();
    let rec = recommend(&req.goal, &known, &struggling_concepts, &graph)?;
    tracing::info!(
        goal = %req.goal,
        goal_concept = %rec.goal_concept,
        len = rec.path.len(),
        "built learning path"
    );

    Ok(Json(PathResponse {
        path: rec.path,
        goal_concept: rec.goal_concept,
        known_concepts,
        struggling_concepts,
    }))
}

/// `POST /suggest_path`
pub async fn suggest_path(
    State(state): State<AppState>,
    Json(req): Json<PathRequest>,
) -> ApiResult<SuggestResponse> {
    let advisor = state
        .advisor
        .clone()
        .ok_or(ApiError::Unavailable("path suggestion"))?;

    let known: HashSet<String> = req.known_concepts.iter().cloned().collect();
    let struggling = dedup(req.struggling_concepts);
    let graph = select_graph(&state, req.topic.as_deref(), req.knowledge_graph).await?;

    let path = advisor.suggest(&req.goal, &known, &struggling, &graph).await?;
    Ok(Json(SuggestResponse { path }))
}

/// `POST /generate_knowledge_graph`
pub async fn generate_knowledge_graph(
    State(state): State<AppState>,
    Json(req): Json<GraphRequest>,
) -> ApiResult<GraphResponse> {
    if normalize_topic(&req.topic).is_empty() {
        return Err(Error::invalid_request("topic is required").into());
    }

    let knowledge_graph = match &state.generator {
        Some(generator) => {
            state
                .cache
                .get_or_build(&req.topic, generator.as_ref())
                .await?
        }
        None => state
            .cache
            .get(&req.topic)
            .await
            .ok_or(ApiError::Unavailable("graph generation"))?,
    };

    Ok(Json(GraphResponse { knowledge_graph }))
}

/// `DELETE /knowledge_graph/{topic}`
pub async fn invalidate_graph(
    State(state): State<AppState>,
    Path(topic): Path<String>,
) -> Json<InvalidateResponse> {
    let removed = state.cache.invalidate(&topic).await;
    let topic = normalize_topic(&topic);
    tracing::info!(%topic, removed, "invalidated cached graph");
    Json(InvalidateResponse { topic, removed })
}

/// `POST /chat`
pub async fn chat(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> ApiResult<ChatResponse> {
    if req.question.trim().is_empty() {
        return Err(Error::invalid_request("question is required").into());
    }
    let assistant = state.chat.clone().ok_or(ApiError::Unavailable("chat"))?;
    let answer = assistant.ask(&req.question).await?;
    Ok(Json(ChatResponse { answer }))
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        cached_topics: state.cache.len().await,
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Pick the graph for a path request: inline graph, then cached topic, then
/// the default graph. Never generates.
async fn select_graph(
    state: &AppState,
    topic: Option<&str>,
    inline: Option<Value>,
) -> Result<Arc<ConceptGraph>, ApiError> {
    if let Some(raw) = inline {
        let graph = normalize_raw(raw).map_err(|e| match e {
            Error::MalformedRawStructure(msg) => {
                Error::invalid_request(format!("knowledge_graph: {msg}"))
            }
            other => other,
        })?;
        return Ok(Arc::new(graph));
    }

    if let Some(topic) = topic.filter(|t| !t.trim().is_empty()) {
        match state.cache.get(topic).await {
            Some(graph) => return Ok(graph),
            None => tracing::debug!(topic, "no cached graph for topic, using default"),
        }
    }

    Ok(Arc::clone(&state.default_graph))
}

fn dedup(items: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
