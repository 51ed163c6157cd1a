//! Model-backed features for learnpath.
//!
//! - [`llm`]: provider trait, Gemini and Claude clients, retries, test mock
//! - [`generator`]: `LlmGraphGenerator`, the `GraphGenerator` used by the cache
//! - [`advisor`]: `PathAdvisor`, an alternate model-suggested path
//! - [`chat`]: `ChatAssistant` for free-form study questions
//! - [`factory`]: building the configured provider

pub mod advisor;
pub mod chat;
pub mod factory;
pub mod generator;
pub mod llm;
pub mod prompts;

pub use learnpath_core::{Error, Result};

pub use advisor::PathAdvisor;
pub use chat::ChatAssistant;
pub use factory::{ProviderKind, ProviderSettings, build_provider};
pub use generator::LlmGraphGenerator;
pub use llm::{LlmProvider, MockLlmProvider, RetryWrapper};
