//! studybuddy-core: question generation, validation, and quiz scoring.
//!
//! This crate defines the data model, the provider trait, and the
//! generate-validate-retry loop that the rest of studybuddy builds on.

pub mod error;
pub mod generator;
pub mod model;
pub mod prompt;
pub mod schema;
pub mod session;
pub mod traits;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{AttemptError, GenerationError, ProviderError, SchemaError, SessionError};
pub use generator::{GeneratorConfig, QuestionGenerator};
pub use model::{Question, QuestionKind, QuizScore};
pub use session::{BatchRequest, QuizSession, SessionState};
