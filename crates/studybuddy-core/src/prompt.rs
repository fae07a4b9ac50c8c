//! Prompt templates for question generation.

use crate::model::QuestionKind;

/// Build the instruction sent to the model for one question.
///
/// Difficulty is lower-cased before it is embedded; topic is passed through
/// untouched.
pub fn build_prompt(kind: QuestionKind, topic: &str, difficulty: &str) -> String {
    let difficulty = difficulty.trim().to_lowercase();
    match kind {
        QuestionKind::MultipleChoice => mcq_prompt(topic, &difficulty),
        QuestionKind::FillBlank => fill_blank_prompt(topic, &difficulty),
    }
}

fn mcq_prompt(topic: &str, difficulty: &str) -> String {
    format!(
        "Generate a {difficulty} multiple-choice question about {topic}.\n\n\
         Return ONLY a JSON object with these exact fields:\n\
         - 'question': A clear, specific question\n\
         - 'options': An array of exactly 4 possible answers\n\
         - 'correct_answer': One of the options that is the correct answer\n\n\
         Example format:\n\
         {{\n\
         \x20   \"question\": \"What is the capital of France?\",\n\
         \x20   \"options\": [\"London\", \"Berlin\", \"Paris\", \"Madrid\"],\n\
         \x20   \"correct_answer\": \"Paris\"\n\
         }}\n\n\
         Your response:"
    )
}

fn fill_blank_prompt(topic: &str, difficulty: &str) -> String {
    format!(
        "Generate a {difficulty} fill-in-the-blank question about {topic}.\n\n\
         Return ONLY a JSON object with these exact fields:\n\
         - 'question': A sentence with '_____' marking where the blank should be\n\
         - 'answer': The correct word or phrase that belongs in the blank\n\n\
         Example format:\n\
         {{\n\
         \x20   \"question\": \"The capital of France is _____.\",\n\
         \x20   \"answer\": \"Paris\"\n\
         }}\n\n\
         Your response:"
    )
}
