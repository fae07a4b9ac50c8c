//! Mock provider for testing.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use studybuddy_core::error::ProviderError;
use studybuddy_core::traits::{CompletionRequest, CompletionResponse, LlmProvider, TokenUsage};

/// A mock LLM provider for exercising the generator without real API calls.
///
/// Replies are taken from a queue in order; once it is empty every call gets
/// the fallback reply.
pub struct MockProvider {
    /// Replies still to hand out.
    queue: Mutex<VecDeque<Result<String, ProviderError>>>,
    /// Reply used when the queue is empty.
    fallback: Result<String, ProviderError>,
    /// Number of calls made.
    call_count: AtomicU32,
    /// Last request received.
    last_request: Mutex<Option<CompletionRequest>>,
}

impl MockProvider {
    /// Create a mock that replays `replies`, then fails with a network error.
    pub fn scripted(replies: Vec<Result<String, ProviderError>>) -> Self {
        Self {
            queue: Mutex::new(replies.into()),
            fallback: Err(ProviderError::NetworkError("mock replies exhausted".into())),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same response.
    pub fn with_fixed_response(response: &str) -> Self {
        Self {
            fallback: Ok(response.to_string()),
            ..Self::scripted(Vec::new())
        }
    }

    /// Create a mock whose every call fails with `error`.
    pub fn failing(error: ProviderError) -> Self {
        Self {
            fallback: Err(error),
            ..Self::scripted(Vec::new())
        }
    }

    /// Get the number of calls made to this provider.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    /// Get the last request made to this provider.
    pub fn last_request(&self) -> Option<CompletionRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        request: &CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        let reply = self
            .queue
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        let content = reply?;
        let completion_tokens = (content.len() / 4) as u32; // Rough estimate
        let prompt_tokens = (request.prompt.len() / 4) as u32;

        Ok(CompletionResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }
}
