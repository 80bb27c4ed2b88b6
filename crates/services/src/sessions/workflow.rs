use std::sync::Arc;

use quiz_core::model::{AttemptId, QuizAttempt, QuizId};
use storage::repository::{AttemptRepository, QuizRepository, StorageError};

use super::countdown::TickOutcome;
use super::state::QuizSession;
use super::submission::Finalized;
use super::view::AttemptReview;
use crate::Clock;
use crate::error::SessionError;

/// Outcome of a submitted session.
///
/// `persist_warning` is set when the attempt could not be stored; the session
/// is completed regardless and the score stays visible.
#[derive(Debug)]
pub struct SubmissionReceipt {
    pub attempt: QuizAttempt,
    pub review: AttemptReview,
    pub persist_warning: Option<StorageError>,
}

/// What a countdown tick did to the session.
#[derive(Debug)]
pub enum TickResult {
    Running { remaining: u32 },
    /// The countdown expired and the session was auto-submitted.
    Submitted(SubmissionReceipt),
}

/// Orchestrates session start and submission against the repositories.
#[derive(Clone)]
pub struct QuizSessionService {
    clock: Clock,
    quizzes: Arc<dyn QuizRepository>,
    attempts: Arc<dyn AttemptRepository>,
}

impl QuizSessionService {
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

    /// Load the quiz and start a fresh session over it.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::QuizNotFound` if the quiz does not exist and
    /// `SessionError::Storage` if loading fails.
    pub async fn start_session(&self, quiz_id: &QuizId) -> Result<QuizSession, SessionError> {
        let quiz = self
            .quizzes
            .get_quiz(quiz_id)
            .await?
            .ok_or_else(|| SessionError::QuizNotFound(quiz_id.clone()))?;
        log::info!(
            "starting session for quiz {} ({} questions, {}s)",
            quiz.id(),
            quiz.question_count(),
            quiz.time_limit_secs()
        );
        Ok(QuizSession::new(quiz, self.clock.now()))
    }

    /// Count one elapsed second, auto-submitting when the countdown reaches zero.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` if the session was already submitted.
    pub async fn tick(&self, session: &mut QuizSession) -> Result<TickResult, SessionError> {
        match session.tick()? {
            TickOutcome::Running { remaining } => Ok(TickResult::Running { remaining }),
            TickOutcome::Expired => {
                let receipt = self.timeout_submit(session).await?;
                Ok(TickResult::Submitted(receipt))
            }
        }
    }

    /// Finalize after the user confirmed the submit prompt.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::InvalidTransition` unless a prompt is open, or
    /// `SessionError::Completed` if already submitted.
    pub async fn confirm_submit(
        &self,
        session: &mut QuizSession,
    ) -> Result<SubmissionReceipt, SessionError> {
        let finalized = session.confirm_submit(self.clock.now())?.clone();
        self.persist(session, finalized).await
    }

    /// Finalize because time ran out, skipping any confirmation.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotExpired` while time remains, or
    /// `SessionError::Completed` if already submitted.
    pub async fn timeout_submit(
        &self,
        session: &mut QuizSession,
    ) -> Result<SubmissionReceipt, SessionError> {
        let finalized = session.timeout_submit(self.clock.now())?.clone();
        log::info!("time is up for quiz {}, submitting", session.quiz().id());
        self.persist(session, finalized).await
    }

    /// Discard a session without recording an attempt.
    pub fn abandon(&self, session: QuizSession) {
        log::info!(
            "session for quiz {} abandoned at question {}",
            session.quiz().id(),
            session.current_index() + 1
        );
    }

    async fn persist(
        &self,
        session: &QuizSession,
        finalized: Finalized,
    ) -> Result<SubmissionReceipt, SessionError> {
        let attempt = QuizAttempt::new(
            AttemptId::generate(),
            session.quiz().id().clone(),
            finalized.score,
            finalized.total_questions,
            finalized.answers,
            finalized.completed_at,
        )?;

        let persist_warning = match self.attempts.append_attempt(&attempt).await {
            Ok(()) => None,
            Err(err) => {
                log::warn!("failed to save attempt {}: {err}", attempt.id());
                Some(err)
            }
        };
        log::info!(
            "quiz {} submitted: {}/{}",
            attempt.quiz_id(),
            attempt.score(),
            attempt.total_questions()
        );

        Ok(SubmissionReceipt {
            review: AttemptReview::build(session.quiz(), &attempt),
            attempt,
            persist_warning,
        })
    }
}
