//! Configuration loading and provider factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use studybuddy_core::generator::GeneratorConfig;
use studybuddy_core::traits::LlmProvider;

use crate::ollama::OllamaProvider;
use crate::openai::OpenAiProvider;

/// Configuration for a single LLM provider.
///
/// Note: Custom Debug impl masks API keys to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ProviderConfig {
    Groq {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    OpenAI {
        #[serde(default)]
        api_key: String,
        #[serde(default)]
        base_url: Option<String>,
    },
    Ollama {
        #[serde(default = "default_ollama_url")]
        base_url: String,
    },
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ProviderConfig::Groq { base_url, .. } => f
                .debug_struct("Groq")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::OpenAI { base_url, .. } => f
                .debug_struct("OpenAI")
                .field("api_key", &"***")
                .field("base_url", base_url)
                .finish(),
            ProviderConfig::Ollama { base_url } => f
                .debug_struct("Ollama")
                .field("base_url", base_url)
                .finish(),
        }
    }
}

fn default_ollama_url() -> String {
    crate::ollama::DEFAULT_BASE_URL.to_string()
}

/// Top-level studybuddy configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudyBuddyConfig {
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Provider used when none is given on the command line.
    #[serde(default = "default_provider")]
    pub default_provider: String,
    /// Model identifier sent with every completion.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Max tokens per completion.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Attempts per question before giving up.
    #[serde(default = "default_retries")]
    pub max_retries: u32,
    /// Directory for exported results.
    #[serde(default = "default_results_dir")]
    pub results_dir: PathBuf,
}

fn default_provider() -> String {
    "groq".to_string()
}
fn default_model() -> String {
    "llama-3.1-8b-instant".to_string()
}
fn default_temperature() -> f64 {
    0.9
}
fn default_max_tokens() -> u32 {
    1024
}
fn default_retries() -> u32 {
    3
}
fn default_results_dir() -> PathBuf {
    PathBuf::from("results")
}

impl Default for StudyBuddyConfig {
    fn default() -> Self {
        Self {
            providers: HashMap::new(),
            default_provider: default_provider(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            max_retries: default_retries(),
            results_dir: default_results_dir(),
        }
    }
}

impl StudyBuddyConfig {
    /// Generation settings derived from this config.
    pub fn generator_config(&self) -> GeneratorConfig {
        GeneratorConfig {
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            max_retries: self.max_retries,
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&lookup(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Resolve env vars in a provider config.
fn resolve_provider_config(
    config: &ProviderConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> ProviderConfig {
    let resolve_url = |u: &Option<String>| u.as_ref().map(|u| resolve_env_vars(u, lookup));
    match config {
        ProviderConfig::Groq { api_key, base_url } => ProviderConfig::Groq {
            api_key: resolve_env_vars(api_key, lookup),
            base_url: resolve_url(base_url),
        },
        ProviderConfig::OpenAI { api_key, base_url } => ProviderConfig::OpenAI {
            api_key: resolve_env_vars(api_key, lookup),
            base_url: resolve_url(base_url),
        },
        ProviderConfig::Ollama { base_url } => ProviderConfig::Ollama {
            base_url: resolve_env_vars(base_url, lookup),
        },
    }
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `studybuddy.toml` in the current directory
/// 2. `~/.config/studybuddy/config.toml`
///
/// Environment variable overrides: `GROQ_API_KEY`, `OPENAI_API_KEY`.
pub fn load_config() -> Result<StudyBuddyConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<StudyBuddyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("studybuddy.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = toml::from_str::<StudyBuddyConfig>(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            config
        }
        None => StudyBuddyConfig::default(),
    };

    Ok(apply_env(config, &|name| std::env::var(name).ok()))
}

/// Apply API key overrides and resolve `${VAR}` references.
fn apply_env(
    mut config: StudyBuddyConfig,
    lookup: &dyn Fn(&str) -> Option<String>,
) -> StudyBuddyConfig {
    if let Some(key) = lookup("GROQ_API_KEY") {
        let entry = config
            .providers
            .entry("groq".into())
            .or_insert(ProviderConfig::Groq {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::Groq { api_key, .. } = entry {
            *api_key = key;
        }
    }

    if let Some(key) = lookup("OPENAI_API_KEY") {
        let entry = config
            .providers
            .entry("openai".into())
            .or_insert(ProviderConfig::OpenAI {
                api_key: String::new(),
                base_url: None,
            });
        if let ProviderConfig::OpenAI { api_key, .. } = entry {
            *api_key = key;
        }
    }

    config.providers = config
        .providers
        .iter()
        .map(|(k, v)| (k.clone(), resolve_provider_config(v, lookup)))
        .collect();

    config
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("studybuddy"))
}

/// Create a provider instance from its configuration.
pub fn create_provider(name: &str, config: &ProviderConfig) -> Result<Box<dyn LlmProvider>> {
    match config {
        ProviderConfig::Groq { api_key, base_url } => {
            anyhow::ensure!(
                !api_key.is_empty(),
                "no API key for provider '{name}' (set GROQ_API_KEY or api_key in the config)"
            );
            Ok(Box::new(OpenAiProvider::groq(api_key, base_url.clone())))
        }
        ProviderConfig::OpenAI { api_key, base_url } => {
            anyhow::ensure!(
                !api_key.is_empty(),
                "no API key for provider '{name}' (set OPENAI_API_KEY or api_key in the config)"
            );
            Ok(Box::new(OpenAiProvider::openai(api_key, base_url.clone())))
        }
        ProviderConfig::Ollama { base_url } => Ok(Box::new(OllamaProvider::new(base_url))),
    }
}
