//! HTTP API for learnpath.
//!
//! | Route | Purpose |
//! |-------|---------|
//! | `POST /generate_path` | deterministic learning path |
//! | `POST /suggest_path` | model-suggested path |
//! | `POST /generate_knowledge_graph` | cached graph for a topic |
//! | `DELETE /knowledge_graph/{topic}` | drop a cached graph |
//! | `POST /chat` | free-form study question |
//! | `GET /health` | liveness |

pub mod error;
pub mod handlers;
pub mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::Router;
use axum::routing::{delete, get, post};
use learnpath_core::Result;
use std::future::Future;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Build the router over `state`.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/generate_path", post(handlers::generate_path))
        .route("/suggest_path", post(handlers::suggest_path))
        .route(
            "/generate_knowledge_graph",
            post(handlers::generate_knowledge_graph),
        )
        .route("/knowledge_graph/{topic}", delete(handlers::invalidate_graph))
        .route("/chat", post(handlers::chat))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve on an already-bound listener until the process exits.
///
/// # Errors
///
/// Returns [`learnpath_core::Error::Io`] if the listener fails.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    serve_with_shutdown(listener, state, std::future::pending()).await
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
///
/// # Errors
///
/// Returns [`learnpath_core::Error::Io`] if the listener fails.
pub async fn serve_with_shutdown(
    listener: TcpListener,
    state: AppState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(%addr, provider = state.has_provider(), "learnpath API listening");
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    tracing::info!("learnpath API stopped");
    Ok(())
}
