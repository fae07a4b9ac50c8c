//! Quiz session state: the generated batch, the user's answers, and results.
//!
//! A session moves `Empty -> Generated -> Scored`. Generating a new batch
//! always starts from `Empty`, and a failed batch leaves it there.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::SessionError;
use crate::generator::QuestionGenerator;
use crate::model::{AnswerRecord, ExportRow, QuestionKind, QuizRecord, QuizScore, ResultRecord};

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Empty,
    Generated,
    Scored,
}

/// Parameters for one batch of questions.
#[derive(Debug, Clone)]
pub struct BatchRequest {
    pub topic: String,
    pub kind: QuestionKind,
    pub difficulty: String,
    pub count: usize,
}

/// A single user's quiz: one batch of questions and its answers.
#[derive(Debug, Clone)]
pub struct QuizSession {
    id: Uuid,
    questions: Vec<QuizRecord>,
    answers: Vec<AnswerRecord>,
    results: Vec<ResultRecord>,
}

impl Default for QuizSession {
    fn default() -> Self {
        Self::new()
    }
}

impl QuizSession {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            questions: Vec::new(),
            answers: Vec::new(),
            results: Vec::new(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        if self.questions.is_empty() {
            SessionState::Empty
        } else if self.results.is_empty() {
            SessionState::Generated
        } else {
            SessionState::Scored
        }
    }

    pub fn questions(&self) -> &[QuizRecord] {
        &self.questions
    }

    pub fn answers(&self) -> &[AnswerRecord] {
        &self.answers
    }

    pub fn results(&self) -> &[ResultRecord] {
        &self.results
    }

    fn reset(&mut self) {
        self.questions.clear();
        self.answers.clear();
        self.results.clear();
    }

    /// Generate `request.count` questions, one provider call chain at a time.
    ///
    /// All-or-nothing: if any question fails, the error is returned and the
    /// session is left empty.
    pub async fn generate_batch(
        &mut self,
        generator: &QuestionGenerator,
        request: &BatchRequest,
    ) -> Result<(), SessionError> {
        self.reset();
        if request.count == 0 {
            return Err(SessionError::EmptyBatch);
        }

        let mut batch = Vec::with_capacity(request.count);
        for index in 0..request.count {
            let question = generator
                .generate(request.kind, &request.topic, &request.difficulty)
                .await
                .map_err(|source| {
                    warn!(
                        session = %self.id,
                        "batch aborted at question {} of {}: {source}",
                        index + 1,
                        request.count
                    );
                    SessionError::Batch {
                        question_number: index + 1,
                        count: request.count,
                        source,
                    }
                })?;
            batch.push(QuizRecord::from(question));
        }

        self.answers = (0..batch.len())
            .map(|question_index| AnswerRecord {
                question_index,
                user_answer: String::new(),
            })
            .collect();
        self.questions = batch;
        info!(
            session = %self.id,
            count = self.questions.len(),
            kind = %request.kind,
            "generated quiz on '{}'",
            request.topic
        );
        Ok(())
    }

    /// Overwrite the answer to the question at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not the index of a generated question.
    pub fn record_answer(&mut self, index: usize, answer: impl Into<String>) {
        assert!(
            index < self.answers.len(),
            "answer index {index} out of range for {} questions",
            self.answers.len()
        );
        self.answers[index].user_answer = answer.into();
    }

    /// Score every question against the current answers.
    ///
    /// Replaces any previous results.
    pub fn evaluate(&mut self) -> Result<QuizScore, SessionError> {
        if self.questions.is_empty() {
            return Err(SessionError::NoQuiz);
        }

        self.results = self
            .questions
            .iter()
            .zip(&self.answers)
            .enumerate()
            .map(|(i, (question, answer))| ResultRecord {
                question_number: i + 1,
                question_text: question.question_text.clone(),
                kind: question.kind,
                user_answer: answer.user_answer.clone(),
                correct_answer: question.correct_answer.clone(),
                options: question.options.clone(),
                is_correct: question.is_correct(&answer.user_answer),
            })
            .collect();

        let score = self.tally();
        info!(session = %self.id, "quiz scored {score} ({}/{})", score.correct, score.total);
        Ok(score)
    }

    /// The score from the latest evaluation, if any.
    pub fn score(&self) -> Option<QuizScore> {
        if self.results.is_empty() {
            None
        } else {
            Some(self.tally())
        }
    }

    fn tally(&self) -> QuizScore {
        QuizScore {
            correct: self.results.iter().filter(|r| r.is_correct).count(),
            total: self.results.len(),
        }
    }

    /// Results as export rows, in question order.
    pub fn export_results(&self) -> Result<Vec<ExportRow>, SessionError> {
        if self.results.is_empty() {
            return Err(SessionError::NoResults);
        }
        Ok(self.results.iter().map(ExportRow::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::error::ProviderError;
    use crate::generator::GeneratorConfig;
    use crate::test_support::{ScriptedProvider, FILL_BLANK_JSON, MCQ_JSON};

    fn generator(provider: &Arc<ScriptedProvider>) -> QuestionGenerator {
        QuestionGenerator::new(provider.clone(), GeneratorConfig::default())
    }

    fn request(kind: QuestionKind, count: usize) -> BatchRequest {
        BatchRequest {
            topic: "geography".into(),
            kind,
            difficulty: "Medium".into(),
            count,
        }
    }

    async fn generated(kind: QuestionKind, count: usize) -> QuizSession {
        let reply = match kind {
            QuestionKind::MultipleChoice => MCQ_JSON,
            QuestionKind::FillBlank => FILL_BLANK_JSON,
        };
        let provider = Arc::new(ScriptedProvider::always(Ok(reply.into())));
        let mut session = QuizSession::new();
        session
            .generate_batch(&generator(&provider), &request(kind, count))
            .await
            .unwrap();
        session
    }

    #[tokio::test]
    async fn batch_moves_to_generated() {
        let session = generated(QuestionKind::MultipleChoice, 3).await;
        assert_eq!(session.state(), SessionState::Generated);
        assert_eq!(session.questions().len(), 3);
        assert_eq!(session.answers().len(), 3);
        assert!(session.answers().iter().all(|a| a.user_answer.is_empty()));
        assert_eq!(session.answers()[2].question_index, 2);
        assert_eq!(session.questions()[0].options.len(), 4);
    }

    #[tokio::test]
    async fn failed_question_discards_whole_batch() {
        // Question 1 succeeds, question 2 fails all three attempts.
        let provider = Arc::new(ScriptedProvider::new(vec![
            Ok(MCQ_JSON.into()),
            Err(ProviderError::NetworkError("down".into())),
            Err(ProviderError::NetworkError("down".into())),
            Err(ProviderError::NetworkError("down".into())),
            Ok(MCQ_JSON.into()),
        ]));
        let mut session = QuizSession::new();
        let err = session
            .generate_batch(
                &generator(&provider),
                &request(QuestionKind::MultipleChoice, 3),
            )
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            SessionError::Batch {
                question_number: 2,
                count: 3,
                ..
            }
        ));
        assert_eq!(session.state(), SessionState::Empty);
        assert!(session.questions().is_empty());
        assert!(session.answers().is_empty());
        assert_eq!(provider.call_count(), 4);
    }

    #[tokio::test]
    async fn regenerating_discards_previous_quiz() {
        let mut session = generated(QuestionKind::MultipleChoice, 2).await;
        session.record_answer(0, "Paris");
        session.evaluate().unwrap();
        assert_eq!(session.state(), SessionState::Scored);

        let provider = Arc::new(ScriptedProvider::always(Ok(FILL_BLANK_JSON.into())));
        session
            .generate_batch(&generator(&provider), &request(QuestionKind::FillBlank, 1))
            .await
            .unwrap();
        assert_eq!(session.state(), SessionState::Generated);
        assert_eq!(session.questions().len(), 1);
        assert!(session.results().is_empty());
        assert_eq!(session.answers()[0].user_answer, "");
    }

    #[tokio::test]
    async fn failed_regeneration_leaves_session_empty() {
        let mut session = generated(QuestionKind::MultipleChoice, 2).await;
        let provider = Arc::new(ScriptedProvider::always(Ok("garbage".into())));
        assert!(session
            .generate_batch(&generator(&provider), &request(QuestionKind::FillBlank, 2))
            .await
            .is_err());
        assert_eq!(session.state(), SessionState::Empty);
    }

    #[tokio::test]
    async fn zero_count_is_rejected() {
        let provider = Arc::new(ScriptedProvider::always(Ok(MCQ_JSON.into())));
        let mut session = QuizSession::new();
        let err = session
            .generate_batch(&generator(&provider), &request(QuestionKind::MultipleChoice, 0))
            .await
            .unwrap_err();
        assert_eq!(err, SessionError::EmptyBatch);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn two_of_three_scores_66_7_percent() {
        let mut session = generated(QuestionKind::MultipleChoice, 3).await;
        session.record_answer(0, "Paris");
        session.record_answer(1, "Berlin");
        session.record_answer(2, "Paris");

        let score = session.evaluate().unwrap();
        assert_eq!(score, QuizScore { correct: 2, total: 3 });
        assert_eq!(format!("{:.1}%", score.percentage()), "66.7%");
        assert_eq!(session.state(), SessionState::Scored);

        let results = session.results();
        assert!(results[0].is_correct);
        assert!(!results[1].is_correct);
        assert_eq!(results[1].user_answer, "Berlin");
        assert_eq!(results[1].correct_answer, "Paris");
        assert_eq!(results[2].question_number, 3);
    }

    #[tokio::test]
    async fn mcq_case_variant_is_wrong() {
        let mut session = generated(QuestionKind::MultipleChoice, 1).await;
        session.record_answer(0, "paris");
        assert_eq!(session.evaluate().unwrap().correct, 0);
    }

    #[tokio::test]
    async fn fill_blank_scoring_is_lenient() {
        let mut session = generated(QuestionKind::FillBlank, 2).await;
        session.record_answer(0, " paris ");
        session.record_answer(1, "Pariss");
        session.evaluate().unwrap();

        let results = session.results();
        assert!(results[0].is_correct);
        assert!(!results[1].is_correct);
        assert!(results[0].options.is_empty());
    }

    #[tokio::test]
    async fn reevaluation_replaces_results() {
        let mut session = generated(QuestionKind::MultipleChoice, 2).await;
        assert_eq!(session.evaluate().unwrap().correct, 0);

        session.record_answer(1, "Paris");
        let score = session.evaluate().unwrap();
        assert_eq!(score.correct, 1);
        assert_eq!(session.results().len(), 2);
        assert_eq!(session.score(), Some(score));
    }

    #[tokio::test]
    async fn export_rows_follow_results() {
        let mut session = generated(QuestionKind::MultipleChoice, 2).await;
        session.record_answer(0, "Paris");
        session.evaluate().unwrap();

        let rows = session.export_results().unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].question_number, 1);
        assert_eq!(rows[0].question_type, "MCQ");
        assert_eq!(rows[0].options, r#"["London","Berlin","Paris","Madrid"]"#);
        assert!(rows[0].is_correct);
        assert_eq!(rows[1].user_answer, "");
        assert!(!rows[1].is_correct);
    }

    #[tokio::test]
    async fn export_before_evaluate_fails() {
        let session = generated(QuestionKind::FillBlank, 1).await;
        assert_eq!(session.export_results().unwrap_err(), SessionError::NoResults);
        assert_eq!(session.score(), None);
    }

    #[test]
    fn empty_session_cannot_be_scored() {
        let mut session = QuizSession::new();
        assert_eq!(session.state(), SessionState::Empty);
        assert_eq!(session.evaluate().unwrap_err(), SessionError::NoQuiz);
        assert_eq!(session.export_results().unwrap_err(), SessionError::NoResults);
    }

    #[tokio::test]
    #[should_panic(expected = "out of range")]
    async fn answer_index_out_of_range_panics() {
        let mut session = generated(QuestionKind::MultipleChoice, 1).await;
        session.record_answer(1, "Paris");
    }
}
