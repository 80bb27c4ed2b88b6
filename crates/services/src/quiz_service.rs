use std::sync::Arc;

use serde::Deserialize;

use quiz_core::model::{Question, QuestionId, Quiz, QuizAttempt, QuizId};
use storage::repository::{AttemptRepository, QuizRepository};

use crate::Clock;
use crate::error::QuizServiceError;
use crate::samples::sample_drafts;

/// Upper bound used when listing quizzes or attempts.
const LIST_LIMIT: u32 = 512;

/// Authoring input for a question, e.g. read from a JSON file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: usize,
}

/// Authoring input for a quiz.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizDraft {
    pub title: String,
    #[serde(default)]
    pub time_limit: Option<u32>,
    pub questions: Vec<QuestionDraft>,
}

impl QuizDraft {
    /// Parse a draft from JSON.
    ///
    /// # Errors
    ///
    /// Returns `serde_json::Error` if the JSON does not describe a draft.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

/// Creates quizzes and lists quizzes and past attempts.
#[derive(Clone)]
pub struct QuizService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl QuizService {
    #[must_use]
    pub fn new(
        clock: Clock,
        quizzes: Arc<dyn QuizRepository>,
        attempts: Arc<dyn AttemptRepository>,
    ) -> Self {
        Self {
            clock,
            quizzes,
            attempts,
        }
    }

    /// Validate a draft, assign ids and timestamps, and persist it.
    ///
    /// Question ids are positional (`q1`, `q2`, ...).
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Question` or `QuizServiceError::Quiz` for
    /// validation failures and `QuizServiceError::Storage` if persistence fails.
    pub async fn create_quiz(&self, draft: QuizDraft) -> Result<Quiz, QuizServiceError> {
        let questions = draft
            .questions
            .into_iter()
            .enumerate()
            .map(|(index, q)| {
                Question::new(
                    QuestionId::for_position(index),
                    q.question,
                    q.options,
                    q.correct_answer,
                )
                .map_err(|source| QuizServiceError::Question { index, source })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let quiz = Quiz::new(
            QuizId::generate(),
            draft.title,
            questions,
            self.clock.now(),
            draft.time_limit,
        )?;
        self.quizzes.upsert_quiz(&quiz).await?;
        log::info!("created quiz {} ({})", quiz.id(), quiz.title());
        Ok(quiz)
    }

    /// List quizzes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn list_quizzes(&self) -> Result<Vec<Quiz>, QuizServiceError> {
        Ok(self.quizzes.list_quizzes(LIST_LIMIT).await?)
    }

    /// Fetch a quiz by ID. Returns `Ok(None)` when it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, QuizServiceError> {
        Ok(self.quizzes.get_quiz(id).await?)
    }

    /// Store the sample quizzes when no quiz exists yet.
    ///
    /// Returns the quizzes that were created, empty when the store already
    /// had content.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError` if listing or storing fails.
    pub async fn seed_samples_if_empty(&self) -> Result<Vec<Quiz>, QuizServiceError> {
        if !self.quizzes.list_quizzes(1).await?.is_empty() {
            return Ok(Vec::new());
        }

        let mut seeded = Vec::new();
        for draft in sample_drafts() {
            seeded.push(self.create_quiz(draft).await?);
        }
        log::info!("seeded {} sample quizzes", seeded.len());
        Ok(seeded)
    }

    /// Past attempts at a quiz, most recent first.
    ///
    /// # Errors
    ///
    /// Returns `QuizServiceError::Storage` if repository access fails.
    pub async fn list_attempts(&self, id: &QuizId) -> Result<Vec<QuizAttempt>, QuizServiceError> {
        Ok(self.attempts.list_attempts(id, LIST_LIMIT).await?)
    }
}
