//! Error types for question generation and quiz sessions.
//!
//! Provider and schema errors are recoverable: the question generator retries
//! both the same way. `GenerationError` and `SessionError` are terminal.

use thiserror::Error;

/// Errors that can occur when interacting with an LLM provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProviderError {
    /// The API returned a 429 rate limit response.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Authentication failed (invalid API key).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The requested model was not found.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),
}

impl ProviderError {
    /// Returns the retry-after delay in milliseconds, if applicable.
    pub fn retry_after_ms(&self) -> Option<u64> {
        match self {
            ProviderError::RateLimited { retry_after_ms } => Some(*retry_after_ms),
            _ => None,
        }
    }
}

/// The model's response could not be turned into a valid question.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("response is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("response JSON is not an object")]
    NotAnObject,

    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` has the wrong shape: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("multiple-choice question must have exactly 4 options, got {0}")]
    WrongOptionCount(usize),

    #[error("correct answer {0:?} is not one of the options")]
    AnswerNotInOptions(String),

    #[error("fill-in-the-blank question must contain '___'")]
    MissingBlankMarker,
}

/// Why a single generation attempt failed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Transport(#[from] ProviderError),

    #[error(transparent)]
    Schema(#[from] SchemaError),
}

/// Question generation gave up after exhausting its retry budget.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("generation failed after {attempts} attempts")]
pub struct GenerationError {
    /// Number of attempts made.
    pub attempts: u32,
    /// Cause of the last attempt's failure.
    #[source]
    pub source: AttemptError,
}

/// Errors surfaced by [`crate::session::QuizSession`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SessionError {
    /// One question of the batch could not be generated; nothing was kept.
    #[error("failed to generate question {question_number} of {count}")]
    Batch {
        question_number: usize,
        count: usize,
        #[source]
        source: GenerationError,
    },

    #[error("a batch must contain at least one question")]
    EmptyBatch,

    #[error("no quiz has been generated")]
    NoQuiz,

    #[error("no results to export, evaluate the quiz first")]
    NoResults,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn generation_error_keeps_cause_chain() {
        let err = GenerationError {
            attempts: 3,
            source: SchemaError::WrongOptionCount(3).into(),
        };
        assert_eq!(err.to_string(), "generation failed after 3 attempts");
        let cause = err.source().unwrap();
        assert!(cause.to_string().contains("exactly 4 options, got 3"));
    }

    #[test]
    fn retry_after_only_for_rate_limits() {
        let limited = ProviderError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(limited.retry_after_ms(), Some(5000));
        assert_eq!(ProviderError::Timeout(120).retry_after_ms(), None);
    }

    #[test]
    fn batch_error_reports_position() {
        let err = SessionError::Batch {
            question_number: 2,
            count: 3,
            source: GenerationError {
                attempts: 3,
                source: ProviderError::NetworkError("connection reset".into()).into(),
            },
        };
        assert_eq!(err.to_string(), "failed to generate question 2 of 3");
    }
}
