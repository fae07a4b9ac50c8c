//! The `studybuddy prompt` command.

use anyhow::Result;

use studybuddy_core::prompt::build_prompt;
use studybuddy_core::QuestionKind;

pub fn execute(kind: QuestionKind, topic: &str, difficulty: &str) -> Result<()> {
    anyhow::ensure!(!topic.trim().is_empty(), "topic must not be empty");
    println!("{}", build_prompt(kind, topic, difficulty));
    Ok(())
}
