//! Free-form study questions answered by a model.

use learnpath_graph::parse_generator_output;
use std::sync::Arc;

use crate::llm::{CompletionRequest, LlmProvider};
use crate::prompts::{CHAT_SYSTEM_PROMPT, chat_prompt};
use crate::{Error, Result};

/// Answers learner questions using an [`LlmProvider`].
pub struct ChatAssistant {
    provider: Arc<dyn LlmProvider>,
}

impl ChatAssistant {
    /// Create an assistant over a provider.
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Answer a question.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRequest`] for a blank question.
    /// - [`Error::MalformedRawStructure`] if the reply has no `answer` string.
    pub async fn ask(&self, question: &str) -> Result<String> {
        let question = question.trim();
        if question.is_empty() {
            return Err(Error::invalid_request("question is required"));
        }

        let request = CompletionRequest::prompt(chat_prompt(question))
            .with_system_prompt(CHAT_SYSTEM_PROMPT)
            .with_json_output();
        let response = self.provider.complete(request).await?;
        let reply = parse_generator_output(&response.content)?;

        reply
            .get("answer")
            .and_then(|a| a.as_str())
            .map(str::to_string)
            .ok_or_else(|| Error::malformed("reply has no \"answer\" string"))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::llm::MockLlmProvider;

    #[tokio::test]
    async fn test_ask_returns_answer() {
        let mock = MockLlmProvider::with_response(r#"{"answer": "A tensor is an n-d array."}"#);
        let assistant = ChatAssistant::new(Arc::new(mock.clone()));

        let answer = assistant.ask("  What is a tensor? ").await.unwrap();
        assert_eq!(answer, "A tensor is an n-d array.");

        let requests = mock.requests().await;
        assert!(
            requests[0].messages[0]
                .content
                .ends_with("Question: What is a tensor?")
        );
        assert_eq!(
            requests[0].system_prompt.as_deref(),
            Some(CHAT_SYSTEM_PROMPT)
        );
    }

    #[tokio::test]
    async fn test_blank_question_rejected_without_calling_provider() {
        let mock = MockLlmProvider::with_response("{}");
        let assistant = ChatAssistant::new(Arc::new(mock.clone()));

        let err = assistant.ask("   ").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(_)));
        assert_eq!(mock.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_answer_is_malformed() {
        let assistant = ChatAssistant::new(Arc::new(MockLlmProvider::with_response(
            r#"{"reply": "wrong key"}"#,
        )));
        let err = assistant.ask("why?").await.unwrap_err();
        assert!(matches!(err, Error::MalformedRawStructure(_)));
    }
}
