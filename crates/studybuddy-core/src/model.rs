//! Core data model types for studybuddy.
//!
//! Validated questions as produced by the schema validator, the normalized
//! records a quiz session keeps, and the derived result and export rows.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Substring every fill-in-the-blank question must contain.
pub const BLANK_MARKER: &str = "___";

/// The two supported question shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice,
    FillBlank,
}

impl QuestionKind {
    /// Label used in the `question_type` export column.
    pub fn label(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice => "MCQ",
            QuestionKind::FillBlank => "Fill in the blank",
        }
    }
}

impl fmt::Display for QuestionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionKind::MultipleChoice => write!(f, "mcq"),
            QuestionKind::FillBlank => write!(f, "fill-blank"),
        }
    }
}

impl FromStr for QuestionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mcq" | "multiple-choice" | "multiple choice" | "multiple_choice" => {
                Ok(QuestionKind::MultipleChoice)
            }
            "fill-blank" | "fill_blank" | "fill in the blank" | "fill-in-the-blank" | "fib" => {
                Ok(QuestionKind::FillBlank)
            }
            other => Err(format!("unknown question kind: {other}")),
        }
    }
}

/// A validated multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct McqQuestion {
    pub question: String,
    /// Exactly four options, in the order the model returned them.
    pub options: Vec<String>,
    /// Equal to one of `options`.
    pub correct_answer: String,
}

/// A validated fill-in-the-blank question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FillBlankQuestion {
    /// Contains [`BLANK_MARKER`].
    pub question: String,
    pub answer: String,
}

/// A question that passed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Question {
    MultipleChoice(McqQuestion),
    FillBlank(FillBlankQuestion),
}

impl Question {
    pub fn kind(&self) -> QuestionKind {
        match self {
            Question::MultipleChoice(_) => QuestionKind::MultipleChoice,
            Question::FillBlank(_) => QuestionKind::FillBlank,
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Question::MultipleChoice(q) => &q.question,
            Question::FillBlank(q) => &q.question,
        }
    }
}

/// A question as held by a quiz session, normalized from either shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizRecord {
    pub kind: QuestionKind,
    pub question_text: String,
    /// Empty for fill-in-the-blank questions.
    pub options: Vec<String>,
    pub correct_answer: String,
}

impl From<Question> for QuizRecord {
    fn from(question: Question) -> Self {
        match question {
            Question::MultipleChoice(q) => QuizRecord {
                kind: QuestionKind::MultipleChoice,
                question_text: q.question,
                options: q.options,
                correct_answer: q.correct_answer,
            },
            Question::FillBlank(q) => QuizRecord {
                kind: QuestionKind::FillBlank,
                question_text: q.question,
                options: Vec::new(),
                correct_answer: q.answer,
            },
        }
    }
}

impl QuizRecord {
    /// Whether `user_answer` counts as correct for this question.
    ///
    /// Multiple-choice answers must match exactly. Fill-in-the-blank answers
    /// are compared after trimming and lower-casing both sides.
    pub fn is_correct(&self, user_answer: &str) -> bool {
        match self.kind {
            QuestionKind::MultipleChoice => user_answer == self.correct_answer,
            QuestionKind::FillBlank => {
                user_answer.trim().to_lowercase() == self.correct_answer.trim().to_lowercase()
            }
        }
    }
}

/// The user's current answer to one question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub question_index: usize,
    pub user_answer: String,
}

/// The outcome of one question after evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// 1-based.
    pub question_number: usize,
    pub question_text: String,
    pub kind: QuestionKind,
    pub user_answer: String,
    pub correct_answer: String,
    pub options: Vec<String>,
    pub is_correct: bool,
}

/// One row of the tabular results export.
///
/// Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    pub question_number: usize,
    pub question: String,
    pub question_type: String,
    pub user_answer: String,
    pub correct_answer: String,
    /// JSON array of the options, `[]` for fill-in-the-blank rows.
    pub options: String,
    pub is_correct: bool,
}

/// Column names of [`ExportRow`], in order.
pub const EXPORT_COLUMNS: [&str; 7] = [
    "question_number",
    "question",
    "question_type",
    "user_answer",
    "correct_answer",
    "options",
    "is_correct",
];

impl From<&ResultRecord> for ExportRow {
    fn from(result: &ResultRecord) -> Self {
        ExportRow {
            question_number: result.question_number,
            question: result.question_text.clone(),
            question_type: result.kind.label().to_string(),
            user_answer: result.user_answer.clone(),
            correct_answer: result.correct_answer.clone(),
            options: serde_json::to_string(&result.options).unwrap_or_else(|_| "[]".into()),
            is_correct: result.is_correct,
        }
    }
}

/// Correct answers out of the questions asked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizScore {
    pub correct: usize,
    pub total: usize,
}

impl QuizScore {
    /// Score as a percentage in `0.0..=100.0`; zero for an empty quiz.
    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f64 / self.total as f64 * 100.0
    }
}

impl fmt::Display for QuizScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}%", self.percentage())
    }
}
