//! LLM provider abstractions and implementations.

mod claude;
mod gemini;
mod mock;
mod provider;
mod retry;

pub use claude::{CLAUDE_API_URL, ClaudeProvider, DEFAULT_CLAUDE_MODEL};
pub use gemini::{DEFAULT_GEMINI_MODEL, GEMINI_API_URL, GeminiProvider};
pub use mock::MockLlmProvider;
pub use provider::{
    CompletionRequest, CompletionResponse, LlmProvider, Message, Role, StopReason, TokenUsage,
};
pub use retry::RetryWrapper;
