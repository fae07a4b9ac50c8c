//! studybuddy-providers: LLM completion clients.
//!
//! Implements the `LlmProvider` trait for OpenAI-compatible endpoints (Groq,
//! OpenAI) and Ollama, plus a scripted mock for tests.

pub mod config;
pub mod mock;
pub mod ollama;
pub mod openai;

pub use config::{create_provider, load_config, load_config_from, ProviderConfig, StudyBuddyConfig};
pub use mock::MockProvider;
