//! Parsing and validation of model output into typed questions.
//!
//! The model is asked for a bare JSON object but often wraps it in a
//! Markdown code fence, and occasionally nests the question text inside an
//! object. Both are normalized here before the per-kind invariants are
//! checked.

use serde_json::{Map, Value};

use crate::error::SchemaError;
use crate::model::{FillBlankQuestion, McqQuestion, Question, QuestionKind, BLANK_MARKER};

const MCQ_OPTION_COUNT: usize = 4;

/// Parse a raw model response and validate it as a question of `kind`.
pub fn parse_and_validate(raw: &str, kind: QuestionKind) -> Result<Question, SchemaError> {
    let cleaned = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(cleaned).map_err(|e| SchemaError::InvalidJson(e.to_string()))?;
    let Value::Object(object) = value else {
        return Err(SchemaError::NotAnObject);
    };

    match kind {
        QuestionKind::MultipleChoice => validate_mcq(&object).map(Question::MultipleChoice),
        QuestionKind::FillBlank => validate_fill_blank(&object).map(Question::FillBlank),
    }
}

/// Remove a surrounding ```` ```json ```` / ```` ``` ```` fence and whitespace.
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn validate_mcq(object: &Map<String, Value>) -> Result<McqQuestion, SchemaError> {
    let question = question_text(object)?;
    let options = match required(object, "options")? {
        Value::Array(items) => items
            .iter()
            .map(|item| scalar_text(item, "options"))
            .collect::<Result<Vec<_>, _>>()?,
        other => {
            return Err(SchemaError::InvalidField {
                field: "options",
                reason: format!("expected an array, got {}", type_name(other)),
            })
        }
    };
    let correct_answer = scalar_text(required(object, "correct_answer")?, "correct_answer")?;

    if options.len() != MCQ_OPTION_COUNT {
        return Err(SchemaError::WrongOptionCount(options.len()));
    }
    if !options.contains(&correct_answer) {
        return Err(SchemaError::AnswerNotInOptions(correct_answer));
    }

    Ok(McqQuestion {
        question,
        options,
        correct_answer,
    })
}

fn validate_fill_blank(object: &Map<String, Value>) -> Result<FillBlankQuestion, SchemaError> {
    let question = question_text(object)?;
    let answer = scalar_text(required(object, "answer")?, "answer")?;

    if !question.contains(BLANK_MARKER) {
        return Err(SchemaError::MissingBlankMarker);
    }

    Ok(FillBlankQuestion { question, answer })
}

fn required<'a>(object: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, SchemaError> {
    match object.get(field) {
        None | Some(Value::Null) => Err(SchemaError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

/// The `question` field, accepting an object with a `description` entry.
fn question_text(object: &Map<String, Value>) -> Result<String, SchemaError> {
    let value = required(object, "question")?;
    Ok(match value {
        Value::String(s) => s.clone(),
        Value::Object(inner) => match inner.get("description") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => value.to_string(),
        },
        other => other.to_string(),
    })
}

fn scalar_text(value: &Value, field: &'static str) -> Result<String, SchemaError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(SchemaError::InvalidField {
            field,
            reason: format!("expected text, got {}", type_name(other)),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
