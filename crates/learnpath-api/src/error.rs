//! Mapping of learnpath errors onto HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use learnpath_core::Error;
use serde_json::json;

/// Error returned by every handler. Renders as `{"error": message}`.
#[derive(Debug)]
pub enum ApiError {
    /// A learnpath error.
    Core(Error),
    /// A feature that needs an LLM provider was called without one.
    Unavailable(&'static str),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Core(err) => match err {
                Error::EmptyGraph => StatusCode::UNPROCESSABLE_ENTITY,
                Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                Error::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn message(&self) -> String {
        match self {
            Self::Core(err) => err.to_string(),
            Self::Unavailable(feature) => format!("{feature} requires an LLM provider"),
        }
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self::Core(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = self.message();
        if status.is_server_error() {
            tracing::error!(%status, "{message}");
        } else {
            tracing::warn!(%status, "{message}");
        }
        (status, Json(json!({ "error": message }))).into_response()
    }
}
