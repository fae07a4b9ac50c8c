//! The `studybuddy init` command.

use std::path::Path;

use anyhow::Result;

pub fn execute() -> Result<()> {
    let path = Path::new("studybuddy.toml");
    if path.exists() {
        println!("studybuddy.toml already exists, skipping.");
        return Ok(());
    }

    std::fs::write(path, SAMPLE_CONFIG)?;
    println!("Created studybuddy.toml");

    println!("\nNext steps:");
    println!("  1. Put GROQ_API_KEY in your environment or a .env file");
    println!("  2. Run: studybuddy quiz --topic \"Chinese History\" --count 3");

    Ok(())
}

const SAMPLE_CONFIG: &str = r#"# studybuddy configuration

default_provider = "groq"
model = "llama-3.1-8b-instant"
temperature = 0.9
max_tokens = 1024
max_retries = 3
results_dir = "results"

[providers.groq]
type = "groq"
api_key = "${GROQ_API_KEY}"

[providers.openai]
type = "openai"
api_key = "${OPENAI_API_KEY}"

[providers.ollama]
type = "ollama"
base_url = "http://localhost:11434"
"#;
