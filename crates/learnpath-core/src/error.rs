//! Error types for learnpath operations.
//!
//! This module provides the `Error` type and `Result<T>` alias used across
//! all learnpath crates. Uses `thiserror` for derive macros.
//!
//! Traversal conditions (missing prerequisites, cycles, a goal the learner
//! already knows) are policy, not errors, and never surface here.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Boxed source error carried by provider failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur in learnpath operations.
#[derive(Error, Debug)]
pub enum Error {
    /// The concept graph has no concepts, so no goal can be resolved.
    #[error("Concept graph is empty")]
    EmptyGraph,

    /// The external graph generator failed (transport, provider, timeout).
    #[error("Graph generator failed: {0}")]
    GeneratorFailure(String),

    /// Generator output could not be interpreted as a concept graph.
    #[error("Malformed graph structure: {0}")]
    MalformedRawStructure(String),

    /// LLM provider error.
    #[error("LLM error: {message}")]
    Llm {
        /// What went wrong.
        message: String,
        /// HTTP status returned by the provider, if any.
        status: Option<u16>,
        /// Underlying error.
        #[source]
        source: Option<BoxError>,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific path.
    #[error("I/O error at {path}: {source}")]
    IoPath {
        /// Path being accessed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Content not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The caller sent a request that cannot be served.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a not found error.
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    /// Create a not found error for a file path.
    pub fn file_not_found(path: impl AsRef<Path>) -> Self {
        Self::NotFound(format!("file {}", path.as_ref().display()))
    }

    /// Create an invalid request error.
    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    /// Create a generator failure.
    pub fn generator(msg: impl Into<String>) -> Self {
        Self::GeneratorFailure(msg.into())
    }

    /// Create a malformed-structure error.
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedRawStructure(msg.into())
    }

    /// Create an LLM error without a source.
    pub fn llm(msg: impl Into<String>) -> Self {
        Self::Llm {
            message: msg.into(),
            status: None,
            source: None,
        }
    }

    /// Create an LLM error for a non-success HTTP status.
    pub fn llm_status(status: u16, msg: impl Into<String>) -> Self {
        Self::Llm {
            message: msg.into(),
            status: Some(status),
            source: None,
        }
    }

    /// Create an LLM error wrapping an underlying error.
    pub fn llm_with_source(
        msg: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Llm {
            message: msg.into(),
            status: None,
            source: Some(Box::new(source)),
        }
    }

    /// Wrap an I/O error with the path that produced it.
    pub fn io_with_path(source: std::io::Error, path: impl AsRef<Path>) -> Self {
        Self::IoPath {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Whether the failure came from the generator side and may be recovered
    /// by falling back to a default graph.
    pub fn is_generator_failure(&self) -> bool {
        matches!(
            self,
            Self::GeneratorFailure(_) | Self::MalformedRawStructure(_) | Self::Llm { .. }
        )
    }

    /// Whether retrying the same request might succeed.
    ///
    /// Transport failures (no status) and HTTP 408/429/5xx are retryable.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Llm { status: None, source, .. } => source.is_some(),
            Self::Llm {
                status: Some(code), ..
            } => *code == 408 || *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias using learnpath's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::EmptyGraph.to_string(), "Concept graph is empty");
        assert_eq!(
            Error::generator("timed out").to_string(),
            "Graph generator failed: timed out"
        );
        assert_eq!(
            Error::malformed("not an object").to_string(),
            "Malformed graph structure: not an object"
        );
    }

    #[test]
    fn test_generator_failure_classification() {
        assert!(Error::generator("x").is_generator_failure());
        assert!(Error::malformed("x").is_generator_failure());
        assert!(Error::llm("x").is_generator_failure());
        assert!(!Error::EmptyGraph.is_generator_failure());
        assert!(!Error::config("x").is_generator_failure());
    }

    #[test]
    fn test_retryable_statuses() {
        assert!(Error::llm_status(429, "rate limited").is_retryable());
        assert!(Error::llm_status(503, "unavailable").is_retryable());
        assert!(Error::llm_status(408, "timeout").is_retryable());
        assert!(!Error::llm_status(400, "bad request").is_retryable());
        assert!(!Error::llm_status(401, "unauthorized").is_retryable());
    }

    #[test]
    fn test_retryable_transport() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionReset, "reset");
        assert!(Error::llm_with_source("send failed", io).is_retryable());
        assert!(!Error::llm("missing content").is_retryable());
        assert!(!Error::EmptyGraph.is_retryable());
    }

    #[test]
    fn test_io_with_path() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::io_with_path(io, "/tmp/graph.json");
        assert!(err.to_string().contains("/tmp/graph.json"));
    }

    #[test]
    fn test_from_serde_json() {
        let err: Error = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Serialization(_)));
    }
}
