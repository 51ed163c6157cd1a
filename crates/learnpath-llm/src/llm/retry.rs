//! Retry wrapper for LLM providers.

use async_trait::async_trait;
use backon::{ExponentialBuilder, Retryable};
use std::sync::Arc;
use std::time::Duration;

use super::provider::{CompletionRequest, CompletionResponse, LlmProvider};
use crate::{Error, Result};

/// Wraps an LLM provider with retry logic.
///
/// Only errors classified by [`Error::is_retryable`] are retried: transport
/// failures and HTTP 408/429/5xx.
pub struct RetryWrapper {
    inner: Arc<dyn LlmProvider>,
    max_attempts: u32,
    initial_delay: Duration,
    max_delay: Duration,
}

impl RetryWrapper {
    /// Creates a new retry wrapper with default settings.
    ///
    /// Default settings:
    /// - Max attempts: 3
    /// - Initial delay: 1 second
    /// - Max delay: 10 seconds
    /// - Multiplier: 2.0 (exponential backoff)
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self {
            inner: provider,
            max_attempts: 3,
            initial_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(10),
        }
    }

    /// Sets the maximum number of attempts, the first call included.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    /// Sets the initial delay between retries.
    pub fn with_initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = delay;
        self
    }

    /// Sets the maximum delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Determines if an error should be retried.
    fn should_retry(error: &Error) -> bool {
        error.is_retryable()
    }
}

#[async_trait]
impl LlmProvider for RetryWrapper {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse> {
        let backoff = ExponentialBuilder::default()
            .with_min_delay(self.initial_delay)
            .with_max_delay(self.max_delay)
            .with_max_times(self.max_attempts.saturating_sub(1) as usize);

        let provider = Arc::clone(&self.inner);

        (|| async { provider.complete(request.clone()).await })
            .retry(backoff)
            .when(Self::should_retry)
            .notify(|err: &Error, delay: Duration| {
                tracing::warn!(
                    provider = provider.name(),
                    ?delay,
                    "retrying LLM call after error: {err}"
                );
            })
            .await
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}
