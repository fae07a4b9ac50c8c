//! studybuddy CLI: generate a quiz on any topic, answer it, get scored.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use studybuddy_core::QuestionKind;

mod commands;

#[derive(Parser)]
#[command(name = "studybuddy", version, about = "LLM-generated quizzes in your terminal")]
struct Cli {
    /// Also append logs to <dir>/log_<YYYY-MM-DD>.log (stderr logging stays on)
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a quiz, answer it on stdin, and score it
    Quiz {
        /// Topic to ask about (e.g. "Chinese History")
        #[arg(long)]
        topic: String,

        /// Question type: mcq or fill-blank
        #[arg(long, default_value = "mcq")]
        kind: QuestionKind,

        /// Difficulty: easy, medium, hard
        #[arg(long, default_value = "medium")]
        difficulty: String,

        /// Number of questions (1-10)
        #[arg(long, default_value = "5")]
        count: usize,

        /// Provider name from the config (default: config's default_provider)
        #[arg(long)]
        provider: Option<String>,

        /// Model override
        #[arg(long)]
        model: Option<String>,

        /// Temperature override
        #[arg(long)]
        temperature: Option<f64>,

        /// Attempts per question override
        #[arg(long)]
        max_retries: Option<u32>,

        /// Save results after scoring
        #[arg(long)]
        save: bool,

        /// Export format: csv, json, all
        #[arg(long, default_value = "csv")]
        format: String,

        /// Results directory (default: config's results_dir)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the prompt that would be sent for one question
    Prompt {
        #[arg(long, default_value = "mcq")]
        kind: QuestionKind,

        #[arg(long)]
        topic: String,

        #[arg(long, default_value = "medium")]
        difficulty: String,
    },

    /// Validate a saved model response against the question schema
    Check {
        #[arg(long, default_value = "mcq")]
        kind: QuestionKind,

        /// File containing the raw response, or "-" for stdin
        #[arg(long)]
        response: PathBuf,
    },

    /// Create a starter studybuddy.toml
    Init,
}

fn init_tracing(log_dir: Option<&Path>) -> Result<()> {
    let filter = EnvFilter::from_default_env().add_directive("studybuddy=info".parse()?);

    match log_dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create log directory {}", dir.display()))?;
            let path = dir.join(format!(
                "log_{}.log",
                chrono::Local::now().format("%Y-%m-%d")
            ));
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(std::io::stderr.and(Mutex::new(file)))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    if let Err(e) = init_tracing(cli.log_dir.as_deref()) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }

    let result = match cli.command {
        Commands::Quiz {
            topic,
            kind,
            difficulty,
            count,
            provider,
            model,
            temperature,
            max_retries,
            save,
            format,
            output,
            config,
        } => {
            commands::quiz::execute(commands::quiz::QuizOptions {
                topic,
                kind,
                difficulty,
                count,
                provider,
                model,
                temperature,
                max_retries,
                save,
                format,
                output,
                config,
            })
            .await
        }
        Commands::Prompt {
            kind,
            topic,
            difficulty,
        } => commands::prompt::execute(kind, &topic, &difficulty),
        Commands::Check { kind, response } => commands::check::execute(kind, &response),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
