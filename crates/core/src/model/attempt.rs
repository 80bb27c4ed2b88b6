use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::model::ids::{AttemptId, QuizId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AttemptError {
    #[error("score ({score}) exceeds total questions ({total})")]
    ScoreExceedsTotal { score: u32, total: u32 },

    #[error("answer count ({answers}) does not match total questions ({total})")]
    AnswerCountMismatch { answers: usize, total: u32 },
}

/// Immutable record of one finished quiz session.
///
/// `answers[i]` is `None` when question `i` was left unanswered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizAttempt {
    id: AttemptId,
    quiz_id: QuizId,
    score: u32,
    total_questions: u32,
    answers: Vec<Option<usize>>,
    completed_at: DateTime<Utc>,
}

impl QuizAttempt {
    /// Creates an attempt, checking that score and answers agree with the total.
    ///
    /// # Errors
    ///
    /// Returns `AttemptError` if `score > total_questions` or the answer count differs.
    pub fn new(
        id: AttemptId,
        quiz_id: QuizId,
        score: u32,
        total_questions: u32,
        answers: Vec<Option<usize>>,
        completed_at: DateTime<Utc>,
    ) -> Result<Self, AttemptError> {
        if score > total_questions {
            return Err(AttemptError::ScoreExceedsTotal {
                score,
                total: total_questions,
            });
        }
        if u32::try_from(answers.len()).ok() != Some(total_questions) {
            return Err(AttemptError::AnswerCountMismatch {
                answers: answers.len(),
                total: total_questions,
            });
        }

        Ok(Self {
            id,
            quiz_id,
            score,
            total_questions,
            answers,
            completed_at,
        })
    }

    #[must_use]
    pub fn id(&self) -> &AttemptId {
        &self.id
    }

    #[must_use]
    pub fn quiz_id(&self) -> &QuizId {
        &self.quiz_id
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    #[must_use]
    pub fn answers(&self) -> &[Option<usize>] {
        &self.answers
    }

    #[must_use]
    pub fn completed_at(&self) -> DateTime<Utc> {
        self.completed_at
    }

    /// Score as a whole percentage, rounded half away from zero.
    #[must_use]
    pub fn percentage(&self) -> u32 {
        if self.total_questions == 0 {
            return 0;
        }
        (self.score * 200 + self.total_questions) / (self.total_questions * 2)
    }
}
