use async_trait::async_trait;
use quiz_core::model::{AttemptId, Quiz, QuizAttempt, QuizId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("not found")]
    NotFound,

    #[error("conflict")]
    Conflict,

    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Repository contract for quiz definitions.
#[async_trait]
pub trait QuizRepository: Send + Sync {
    /// Persist or replace a quiz, including its questions.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the quiz cannot be stored.
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError>;

    /// Fetch a quiz by ID. `Ok(None)` means the quiz does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError>;

    /// List quizzes, newest first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_quizzes(&self, limit: u32) -> Result<Vec<Quiz>, StorageError>;
}

/// Append-only store of finished attempts.
#[async_trait]
pub trait AttemptRepository: Send + Sync {
    /// Append a finished attempt.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Conflict` if an attempt with the same id exists,
    /// or other storage errors.
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<(), StorageError>;

    /// List attempts for a quiz, most recently completed first.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` on backend failures.
    async fn list_attempts(
        &self,
        quiz_id: &QuizId,
        limit: u32,
    ) -> Result<Vec<QuizAttempt>, StorageError>;
}

/// Simple in-memory repository implementation for testing and prototyping.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    quizzes: Arc<Mutex<HashMap<QuizId, Quiz>>>,
    attempts: Arc<Mutex<Vec<QuizAttempt>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a stored attempt by id.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if no attempt has the given id.
    pub fn attempt(&self, id: &AttemptId) -> Result<QuizAttempt, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard
            .iter()
            .find(|a| a.id() == id)
            .cloned()
            .ok_or(StorageError::NotFound)
    }
}

fn limit_usize(limit: u32) -> usize {
    usize::try_from(limit).unwrap_or(usize::MAX)
}

#[async_trait]
impl QuizRepository for InMemoryRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(quiz.id().clone(), quiz.clone());
        Ok(())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.get(id).cloned())
    }

    async fn list_quizzes(&self, limit: u32) -> Result<Vec<Quiz>, StorageError> {
        let guard = self
            .quizzes
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let mut quizzes: Vec<Quiz> = guard.values().cloned().collect();
        quizzes.sort_by(|a, b| {
            b.created_at()
                .cmp(&a.created_at())
                .then_with(|| a.id().cmp(b.id()))
        });
        quizzes.truncate(limit_usize(limit));
        Ok(quizzes)
    }
}

#[async_trait]
impl AttemptRepository for InMemoryRepository {
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<(), StorageError> {
        let mut guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        if guard.iter().any(|a| a.id() == attempt.id()) {
            return Err(StorageError::Conflict);
        }
        guard.push(attempt.clone());
        Ok(())
    }

    async fn list_attempts(
        &self,
        quiz_id: &QuizId,
        limit: u32,
    ) -> Result<Vec<QuizAttempt>, StorageError> {
        let guard = self
            .attempts
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        // Insertion order breaks ties: later appends come first.
        let mut out: Vec<(usize, QuizAttempt)> = guard
            .iter()
            .enumerate()
            .filter(|(_, a)| a.quiz_id() == quiz_id)
            .map(|(i, a)| (i, a.clone()))
            .collect();
        out.sort_by(|(ia, a), (ib, b)| b.completed_at().cmp(&a.completed_at()).then(ib.cmp(ia)));
        Ok(out
            .into_iter()
            .map(|(_, a)| a)
            .take(limit_usize(limit))
            .collect())
    }
}

/// Aggregates quiz and attempt repositories behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub quizzes: Arc<dyn QuizRepository>,
    pub attempts: Arc<dyn AttemptRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        let repo = InMemoryRepository::new();
        let quizzes: Arc<dyn QuizRepository> = Arc::new(repo.clone());
        let attempts: Arc<dyn AttemptRepository> = Arc::new(repo);
        Self { quizzes, attempts }
    }
}
