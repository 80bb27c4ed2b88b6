use chrono::{DateTime, Utc};

use super::state::{QuizSession, SessionPhase};
use crate::error::SessionError;

/// Shown when the user asks to submit: how many questions are still open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmitPrompt {
    pub unanswered: usize,
}

/// What finalized the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTrigger {
    Confirmed,
    Timeout,
}

/// Frozen result of a submitted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Finalized {
    pub score: u32,
    pub total_questions: u32,
    pub answers: Vec<Option<usize>>,
    pub completed_at: DateTime<Utc>,
    pub trigger: SubmitTrigger,
}

impl QuizSession {
    /// Open the submit confirmation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` after submission and
    /// `SessionError::InvalidTransition` if a confirmation is already open.
    pub fn request_submit(&mut self) -> Result<SubmitPrompt, SessionError> {
        self.ensure_active()?;
        if self.phase != SessionPhase::InProgress {
            return Err(SessionError::InvalidTransition {
                op: "request submit",
                phase: self.phase,
            });
        }
        self.phase = SessionPhase::AwaitingConfirmation;
        Ok(SubmitPrompt {
            unanswered: self.unanswered_count(),
        })
    }

    /// Dismiss the submit confirmation and keep going.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless a confirmation is open.
    pub fn cancel_submit(&mut self) -> Result<(), SessionError> {
        self.ensure_active()?;
        if self.phase != SessionPhase::AwaitingConfirmation {
            return Err(SessionError::InvalidTransition {
                op: "cancel submit",
                phase: self.phase,
            });
        }
        self.phase = SessionPhase::InProgress;
        Ok(())
    }

    /// Number of questions whose selection equals the correct option.
    #[must_use]
    pub fn score(&self) -> u32 {
        let correct = self
            .quiz
            .questions()
            .iter()
            .zip(&self.selected_answers)
            .filter(|(question, answer)| question.is_correct(**answer))
            .count();
        u32::try_from(correct).unwrap_or(u32::MAX)
    }

    /// Finalize after the user confirmed the prompt.
    pub(crate) fn confirm_submit(
        &mut self,
        completed_at: DateTime<Utc>,
    ) -> Result<&Finalized, SessionError> {
        self.ensure_active()?;
        if self.phase != SessionPhase::AwaitingConfirmation {
            return Err(SessionError::InvalidTransition {
                op: "confirm submit",
                phase: self.phase,
            });
        }
        Ok(self.finalize(SubmitTrigger::Confirmed, completed_at))
    }

    /// Finalize because the countdown ran out. Any open prompt is dismissed.
    pub(crate) fn timeout_submit(
        &mut self,
        completed_at: DateTime<Utc>,
    ) -> Result<&Finalized, SessionError> {
        self.ensure_active()?;
        if self.remaining_seconds > 0 {
            return Err(SessionError::NotExpired {
                remaining: self.remaining_seconds,
            });
        }
        Ok(self.finalize(SubmitTrigger::Timeout, completed_at))
    }

    fn finalize(&mut self, trigger: SubmitTrigger, completed_at: DateTime<Utc>) -> &Finalized {
        let finalized = Finalized {
            score: self.score(),
            total_questions: u32::try_from(self.total_questions()).unwrap_or(u32::MAX),
            answers: self.selected_answers.clone(),
            completed_at,
            trigger,
        };
        self.pending_advance = None;
        self.phase = SessionPhase::Completed;
        self.finalized.insert(finalized)
    }
}
