//! The `studybuddy quiz` command.

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};

use studybuddy_core::model::{ExportRow, QuizRecord};
use studybuddy_core::traits::LlmProvider;
use studybuddy_core::{BatchRequest, QuestionGenerator, QuestionKind, QuizScore, QuizSession};
use studybuddy_providers::{create_provider, load_config_from};
use studybuddy_report::csv::write_results_csv;
use studybuddy_report::json::write_results_json;
use studybuddy_report::DEFAULT_PREFIX;

pub const MAX_QUESTIONS: usize = 10;

pub struct QuizOptions {
    pub topic: String,
    pub kind: QuestionKind,
    pub difficulty: String,
    pub count: usize,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f64>,
    pub max_retries: Option<u32>,
    pub save: bool,
    pub format: String,
    pub output: Option<PathBuf>,
    pub config: Option<PathBuf>,
}

pub async fn execute(opts: QuizOptions) -> Result<()> {
    anyhow::ensure!(!opts.topic.trim().is_empty(), "topic must not be empty");
    anyhow::ensure!(
        (1..=MAX_QUESTIONS).contains(&opts.count),
        "count must be between 1 and {MAX_QUESTIONS}"
    );
    let formats = parse_formats(&opts.format)?;

    let mut config = load_config_from(opts.config.as_deref())?;
    if let Some(model) = opts.model {
        config.model = model;
    }
    if let Some(temperature) = opts.temperature {
        config.temperature = temperature;
    }
    if let Some(max_retries) = opts.max_retries {
        config.max_retries = max_retries;
    }
    anyhow::ensure!(
        (0.0..=2.0).contains(&config.temperature),
        "temperature must be between 0.0 and 2.0"
    );

    let provider_name = opts
        .provider
        .unwrap_or_else(|| config.default_provider.clone());
    let provider_config = config.providers.get(&provider_name).with_context(|| {
        format!(
            "provider '{provider_name}' not found in config. Available: {:?}",
            config.providers.keys().collect::<Vec<_>>()
        )
    })?;
    let provider: Arc<dyn LlmProvider> =
        Arc::from(create_provider(&provider_name, provider_config)?);

    let generator = QuestionGenerator::new(provider, config.generator_config());
    let request = BatchRequest {
        topic: opts.topic,
        kind: opts.kind,
        difficulty: opts.difficulty,
        count: opts.count,
    };

    eprintln!(
        "Generating {} {} question(s) about '{}' with {provider_name}/{}...",
        request.count,
        request.kind.label(),
        request.topic,
        config.model
    );

    let mut session = QuizSession::new();
    session.generate_batch(&generator, &request).await?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    collect_answers(&mut session, stdin.lock(), stdout.lock())?;

    let score = session.evaluate()?;
    print_results(&session, score);

    if opts.save {
        let dir = opts.output.unwrap_or(config.results_dir);
        match session.export_results() {
            Ok(rows) => {
                for format in &formats {
                    match save(&rows, &dir, format) {
                        Ok(path) => eprintln!("Results saved to: {}", path.display()),
                        Err(e) => {
                            tracing::warn!("export failed: {e:#}");
                            eprintln!("Warning: could not save {format} results: {e:#}");
                        }
                    }
                }
            }
            Err(e) => eprintln!("Warning: nothing to save: {e}"),
        }
    }

    Ok(())
}

fn parse_formats(format: &str) -> Result<Vec<&'static str>> {
    if format == "all" {
        return Ok(vec!["csv", "json"]);
    }
    format
        .split(',')
        .map(|f| match f.trim() {
            "csv" => Ok("csv"),
            "json" => Ok("json"),
            other => anyhow::bail!("unknown export format: '{other}' (expected csv, json or all)"),
        })
        .collect()
}

fn save(rows: &[ExportRow], dir: &Path, format: &str) -> Result<PathBuf> {
    match format {
        "json" => write_results_json(rows, dir, DEFAULT_PREFIX),
        _ => write_results_csv(rows, dir, DEFAULT_PREFIX),
    }
}

/// Show each question and read one answer line per question from `input`.
///
/// End of input leaves the remaining answers empty.
fn collect_answers<R: BufRead, W: Write>(
    session: &mut QuizSession,
    mut input: R,
    mut output: W,
) -> Result<()> {
    let questions: Vec<QuizRecord> = session.questions().to_vec();

    for (i, question) in questions.iter().enumerate() {
        writeln!(output, "\nQuestion {}: {}", i + 1, question.question_text)?;
        for (n, option) in question.options.iter().enumerate() {
            writeln!(output, "  {}) {option}", n + 1)?;
        }
        write!(output, "Your answer: ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            continue;
        }
        session.record_answer(i, resolve_answer(question, line.trim_end_matches(['\r', '\n'])));
    }

    Ok(())
}

/// For multiple-choice questions an option number selects that option;
/// anything else is taken verbatim.
fn resolve_answer(question: &QuizRecord, input: &str) -> String {
    if question.kind == QuestionKind::MultipleChoice {
        if let Ok(n) = input.trim().parse::<usize>() {
            if let Some(option) = n.checked_sub(1).and_then(|i| question.options.get(i)) {
                return option.clone();
            }
        }
    }
    input.to_string()
}

fn print_results(session: &QuizSession, score: QuizScore) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec!["#", "Question", "Your answer", "Correct answer", "Result"]);

    for result in session.results() {
        table.add_row(vec![
            Cell::new(result.question_number),
            Cell::new(&result.question_text),
            Cell::new(&result.user_answer),
            Cell::new(&result.correct_answer),
            Cell::new(if result.is_correct { "✅" } else { "❌" }),
        ]);
    }

    println!("\n{table}");
    println!("Score: {score} ({}/{})", score.correct, score.total);
}
