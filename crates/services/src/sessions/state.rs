use chrono::{DateTime, Utc};
use std::fmt;

use quiz_core::model::{Question, Quiz};

use super::submission::Finalized;
use crate::error::SessionError;

//
// ─── LIFECYCLE ─────────────────────────────────────────────────────────────────
//

/// Submission lifecycle of a session.
///
/// `InProgress -> AwaitingConfirmation -> Completed`, plus the direct
/// `InProgress -> Completed` edge taken when the countdown runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    InProgress,
    AwaitingConfirmation,
    Completed,
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::InProgress => "in progress",
            SessionPhase::AwaitingConfirmation => "awaiting confirmation",
            SessionPhase::Completed => "completed",
        };
        f.write_str(s)
    }
}

//
// ─── SESSION ───────────────────────────────────────────────────────────────────
//

/// In-memory state of one attempt at a quiz.
///
/// The per-question vectors (`selected_answers`, `marked_for_review`, `visited`)
/// always have one entry per question, and the current question is always
/// marked visited. Once completed the state is frozen.
pub struct QuizSession {
    pub(super) quiz: Quiz,
    pub(super) current_index: usize,
    pub(super) selected_answers: Vec<Option<usize>>,
    pub(super) marked_for_review: Vec<bool>,
    pub(super) visited: Vec<bool>,
    pub(super) remaining_seconds: u32,
    pub(super) phase: SessionPhase,
    /// Index the pending mark-for-review advance starts from.
    pub(super) pending_advance: Option<usize>,
    pub(super) started_at: DateTime<Utc>,
    pub(super) finalized: Option<Finalized>,
}

impl QuizSession {
    /// Start a fresh session over `quiz`.
    ///
    /// The countdown starts at the quiz time limit (30 minutes when unset).
    #[must_use]
    pub fn new(quiz: Quiz, started_at: DateTime<Utc>) -> Self {
        let total = quiz.question_count();
        let mut visited = vec![false; total];
        if let Some(first) = visited.first_mut() {
            *first = true;
        }

        Self {
            remaining_seconds: quiz.time_limit_secs(),
            quiz,
            current_index: 0,
            selected_answers: vec![None; total],
            marked_for_review: vec![false; total],
            visited,
            phase: SessionPhase::InProgress,
            pending_advance: None,
            started_at,
            finalized: None,
        }
    }

    #[must_use]
    pub fn quiz(&self) -> &Quiz {
        &self.quiz
    }

    #[must_use]
    pub fn total_questions(&self) -> usize {
        self.quiz.question_count()
    }

    #[must_use]
    pub fn last_index(&self) -> usize {
        self.total_questions().saturating_sub(1)
    }

    #[must_use]
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    #[must_use]
    pub fn current_question(&self) -> Option<&Question> {
        self.quiz.question(self.current_index)
    }

    #[must_use]
    pub fn is_last_question(&self) -> bool {
        self.current_index == self.last_index()
    }

    #[must_use]
    pub fn selected_answers(&self) -> &[Option<usize>] {
        &self.selected_answers
    }

    /// Selection for the current question.
    #[must_use]
    pub fn current_answer(&self) -> Option<usize> {
        self.selected_answers.get(self.current_index).copied().flatten()
    }

    #[must_use]
    pub fn marked_for_review(&self) -> &[bool] {
        &self.marked_for_review
    }

    #[must_use]
    pub fn visited(&self) -> &[bool] {
        &self.visited
    }

    #[must_use]
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    #[must_use]
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.phase == SessionPhase::Completed
    }

    #[must_use]
    pub fn is_awaiting_confirmation(&self) -> bool {
        self.phase == SessionPhase::AwaitingConfirmation
    }

    #[must_use]
    pub fn has_pending_advance(&self) -> bool {
        self.pending_advance.is_some()
    }

    #[must_use]
    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Final result once the session has been submitted.
    #[must_use]
    pub fn finalized(&self) -> Option<&Finalized> {
        self.finalized.as_ref()
    }

    #[must_use]
    pub fn unanswered_count(&self) -> usize {
        self.selected_answers.iter().filter(|a| a.is_none()).count()
    }

    #[must_use]
    pub fn answered_count(&self) -> usize {
        self.total_questions() - self.unanswered_count()
    }

    /// Rejects any mutation once the session is completed.
    pub(super) fn ensure_active(&self) -> Result<(), SessionError> {
        if self.is_completed() {
            return Err(SessionError::Completed);
        }
        Ok(())
    }

    pub(super) fn check_index(&self, index: usize) -> Result<(), SessionError> {
        if index >= self.total_questions() {
            return Err(SessionError::QuestionOutOfRange {
                index,
                total: self.total_questions(),
            });
        }
        Ok(())
    }

    /// Moves to `index`, keeping the current question marked visited.
    pub(super) fn move_to(&mut self, index: usize) {
        self.current_index = index;
        self.visited[index] = true;
    }
}

impl fmt::Debug for QuizSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuizSession")
            .field("quiz_id", self.quiz.id())
            .field("questions_len", &self.total_questions())
            .field("current_index", &self.current_index)
            .field("remaining_seconds", &self.remaining_seconds)
            .field("phase", &self.phase)
            .field("pending_advance", &self.pending_advance)
            .field("started_at", &self.started_at)
            .finish_non_exhaustive()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
