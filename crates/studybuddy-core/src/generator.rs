//! Question generation with bounded retry.
//!
//! Each attempt builds the prompt, asks the provider for a completion and
//! validates the reply. Transport and schema failures are treated alike:
//! the next attempt starts immediately, and the last failure is returned
//! once the budget is spent.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::error::{AttemptError, GenerationError};
use crate::model::{Question, QuestionKind};
use crate::prompt::build_prompt;
use crate::schema::parse_and_validate;
use crate::traits::{CompletionRequest, LlmProvider};

/// Configuration for the question generator.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// Model identifier sent with every request.
    pub model: String,
    /// Sampling temperature.
    pub temperature: f64,
    /// Max tokens for generation.
    pub max_tokens: u32,
    /// Attempts per question; `0` behaves like `1`.
    pub max_retries: u32,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model: "llama-3.1-8b-instant".to_string(),
            temperature: 0.9,
            max_tokens: 1024,
            max_retries: 3,
        }
    }
}

/// Turns a topic into validated questions using an LLM provider.
pub struct QuestionGenerator {
    provider: Arc<dyn LlmProvider>,
    config: GeneratorConfig,
}

impl QuestionGenerator {
    pub fn new(provider: Arc<dyn LlmProvider>, config: GeneratorConfig) -> Self {
        Self { provider, config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate one question, retrying up to `max_retries` times.
    pub async fn generate(
        &self,
        kind: QuestionKind,
        topic: &str,
        difficulty: &str,
    ) -> Result<Question, GenerationError> {
        let max_attempts = self.config.max_retries.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            info!(
                provider = self.provider.name(),
                %kind,
                "generating question for topic '{topic}' with difficulty '{difficulty}' (attempt {attempt})"
            );

            match self.attempt(kind, topic, difficulty).await {
                Ok(question) => {
                    info!(%kind, attempt, "successfully parsed the question");
                    return Ok(question);
                }
                Err(source) => {
                    warn!(%kind, attempt, "attempt failed: {source}");
                    if attempt >= max_attempts {
                        return Err(GenerationError {
                            attempts: attempt,
                            source,
                        });
                    }
                }
            }
        }
    }

    async fn attempt(
        &self,
        kind: QuestionKind,
        topic: &str,
        difficulty: &str,
    ) -> Result<Question, AttemptError> {
        let request = CompletionRequest {
            model: self.config.model.clone(),
            prompt: build_prompt(kind, topic, difficulty),
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let response = self.provider.complete(&request).await?;
        debug!(
            model = %response.model,
            latency_ms = response.latency_ms,
            total_tokens = response.token_usage.total_tokens,
            "raw completion: {}",
            response.content
        );

        Ok(parse_and_validate(&response.content, kind)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ProviderError, SchemaError};
    use crate::test_support::{ScriptedProvider, FILL_BLANK_JSON, MCQ_JSON};

    fn generator(provider: &Arc<ScriptedProvider>, max_retries: u32) -> QuestionGenerator {
        QuestionGenerator::new(
            provider.clone(),
            GeneratorConfig {
                model: "test-model".into(),
                max_retries,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn first_attempt_success() {
        let provider = Arc::new(ScriptedProvider::new(vec![Ok(MCQ_JSON.into())]));
        let question = generator(&provider, 3)
            .generate(QuestionKind::MultipleChoice, "geography", "Medium")
            .await
            .unwrap();

        assert_eq!(question.text(), "What is the capital of France?");
        assert_eq!(provider.call_count(), 1);

        let request = provider.last_request().unwrap();
        assert_eq!(request.model, "test-model");
        assert_eq!(request.temperature, 0.9);
        assert!(request.prompt.contains("medium multiple-choice question about geography"));
    }

    #[tokio::test]
    async fn recovers_after_n_failures() {
        for failures in 0..3u32 {
            let mut script: Vec<Result<String, ProviderError>> = Vec::new();
            for i in 0..failures {
                if i % 2 == 0 {
                    script.push(Err(ProviderError::NetworkError("connection reset".into())));
                } else {
                    script.push(Ok("not json at all".into()));
                }
            }
            script.push(Ok(FILL_BLANK_JSON.into()));

            let provider = Arc::new(ScriptedProvider::new(script));
            let question = generator(&provider, 3)
                .generate(QuestionKind::FillBlank, "geography", "easy")
                .await
                .unwrap();

            assert_eq!(question.kind(), QuestionKind::FillBlank);
            assert_eq!(provider.call_count(), failures + 1);
        }
    }

    #[tokio::test]
    async fn always_failing_exhausts_budget() {
        let provider = Arc::new(ScriptedProvider::always(Err(ProviderError::ApiError {
            status: 500,
            message: "internal error".into(),
        })));
        let err = generator(&provider, 3)
            .generate(QuestionKind::MultipleChoice, "history", "hard")
            .await
            .unwrap_err();

        assert_eq!(provider.call_count(), 3);
        assert_eq!(err.attempts, 3);
        assert!(matches!(
            err.source,
            AttemptError::Transport(ProviderError::ApiError { status: 500, .. })
        ));
    }

    #[tokio::test]
    async fn last_cause_is_reported() {
        let provider = Arc::new(ScriptedProvider::new(vec![
            Err(ProviderError::Timeout(120)),
            Ok(r#"{"question": "No blank here.", "answer": "x"}"#.into()),
        ]));
        let err = generator(&provider, 2)
            .generate(QuestionKind::FillBlank, "physics", "medium")
            .await
            .unwrap_err();

        assert_eq!(err.attempts, 2);
        assert_eq!(err.source, AttemptError::Schema(SchemaError::MissingBlankMarker));
    }

    #[tokio::test]
    async fn wrong_kind_reply_is_retried() {
        // A fill-blank reply to an MCQ prompt lacks `options`.
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(FILL_BLANK_JSON.into()),
            Ok(MCQ_JSON.into()),
        ]));
        let question = generator(&provider, 3)
            .generate(QuestionKind::MultipleChoice, "geography", "medium")
            .await
            .unwrap();
        assert_eq!(question.kind(), QuestionKind::MultipleChoice);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn zero_retries_still_attempts_once() {
        let provider = Arc::new(ScriptedProvider::always(Ok("{}".into())));
        let err = generator(&provider, 0)
            .generate(QuestionKind::MultipleChoice, "geography", "medium")
            .await
            .unwrap_err();
        assert_eq!(provider.call_count(), 1);
        assert_eq!(err.attempts, 1);
    }
}
