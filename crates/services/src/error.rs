//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::model::{AttemptError, QuestionError, QuizError, QuizId};
use storage::repository::StorageError;

use crate::sessions::SessionPhase;

/// Errors emitted by the quiz-taking session.
///
/// Everything except `QuizNotFound` and `Storage` is a contract violation: the
/// operation was rejected and the session left untouched.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("quiz {0} not found")]
    QuizNotFound(QuizId),
    #[error("session already completed")]
    Completed,
    #[error("cannot {op} while {phase}")]
    InvalidTransition {
        op: &'static str,
        phase: SessionPhase,
    },
    #[error("question {index} is out of range (quiz has {total})")]
    QuestionOutOfRange { index: usize, total: usize },
    #[error("option {option} is out of range (question has {options})")]
    OptionOutOfRange { option: usize, options: usize },
    #[error("countdown has not expired ({remaining}s remaining)")]
    NotExpired { remaining: u32 },
    #[error(transparent)]
    Attempt(#[from] AttemptError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Errors emitted by `QuizService`.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("question {index}: {source}")]
    Question {
        index: usize,
        #[source]
        source: QuestionError,
    },
    #[error(transparent)]
    Quiz(#[from] QuizError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}
