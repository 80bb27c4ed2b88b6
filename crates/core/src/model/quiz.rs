use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::QuizId;
use crate::model::question::Question;

/// Time limit applied when a quiz does not configure one.
pub const DEFAULT_TIME_LIMIT_MINUTES: u32 = 30;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuizError {
    #[error("quiz title cannot be empty")]
    EmptyTitle,

    #[error("quiz must contain at least one question")]
    NoQuestions,

    #[error("time limit must be > 0 minutes")]
    InvalidTimeLimit,

    #[error("updated_at is before created_at")]
    InvalidTimeRange,
}

//
// ─── QUIZ ──────────────────────────────────────────────────────────────────────
//

/// An ordered set of questions taken under an optional time limit.
///
/// A quiz is never mutated while a session over it is running; sessions hold
/// their own copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quiz {
    id: QuizId,
    title: String,
    questions: Vec<Question>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    time_limit_minutes: Option<u32>,
}

impl Quiz {
    /// Creates a new quiz with `updated_at == created_at`.
    ///
    /// # Errors
    ///
    /// Returns `QuizError` if the title is blank, there are no questions, or
    /// the time limit is zero.
    pub fn new(
        id: QuizId,
        title: impl Into<String>,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
        time_limit_minutes: Option<u32>,
    ) -> Result<Self, QuizError> {
        Self::from_persisted(
            id,
            title,
            questions,
            created_at,
            created_at,
            time_limit_minutes,
        )
    }

    /// Rehydrate a quiz from persisted storage.
    ///
    /// # Errors
    ///
    /// Same as [`Quiz::new`], plus `QuizError::InvalidTimeRange` when
    /// `updated_at` precedes `created_at`.
    pub fn from_persisted(
        id: QuizId,
        title: impl Into<String>,
        questions: Vec<Question>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
        time_limit_minutes: Option<u32>,
    ) -> Result<Self, QuizError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(QuizError::EmptyTitle);
        }
        if questions.is_empty() {
            return Err(QuizError::NoQuestions);
        }
        if time_limit_minutes == Some(0) {
            return Err(QuizError::InvalidTimeLimit);
        }
        if updated_at < created_at {
            return Err(QuizError::InvalidTimeRange);
        }

        Ok(Self {
            id,
            title,
            questions,
            created_at,
            updated_at,
            time_limit_minutes,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuizId {
        &self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    #[must_use]
    pub fn question(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    #[must_use]
    pub fn question_count(&self) -> usize {
        self.questions.len()
    }

    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Configured limit in minutes, if any.
    #[must_use]
    pub fn time_limit_minutes(&self) -> Option<u32> {
        self.time_limit_minutes
    }

    /// Countdown length in seconds, falling back to [`DEFAULT_TIME_LIMIT_MINUTES`].
    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_minutes
            .unwrap_or(DEFAULT_TIME_LIMIT_MINUTES)
            .saturating_mul(60)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
