use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use super::countdown::CountdownTimer;
use super::state::QuizSession;
use super::submission::SubmitPrompt;
use super::workflow::{QuizSessionService, SubmissionReceipt, TickResult};
use crate::error::SessionError;

/// Delay between flipping a review mark and moving to the next question.
pub const MARK_ADVANCE_DELAY: Duration = Duration::from_millis(100);

/// User input fed to a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    SelectAnswer(usize),
    Next,
    Previous,
    JumpTo(usize),
    ToggleMark,
    RequestSubmit,
    CancelSubmit,
    ConfirmSubmit,
    Exit,
}

/// Notification passed to the observer after every processed event.
#[derive(Debug)]
pub enum SessionUpdate<'a> {
    Started,
    Changed(SessionCommand),
    /// The delayed advance after a review mark was applied.
    Advanced,
    Tick { remaining: u32 },
    SubmitPrompt(SubmitPrompt),
    /// A command was rejected; the session is unchanged.
    Rejected {
        command: SessionCommand,
        error: &'a SessionError,
    },
}

/// How a driven session ended.
#[derive(Debug)]
pub enum DriverOutcome {
    Completed(SubmissionReceipt),
    Abandoned,
}

/// Runs one session as a single actor: user commands, timer ticks and the
/// delayed mark-for-review advance are processed one at a time.
#[derive(Clone)]
pub struct SessionDriver {
    service: Arc<QuizSessionService>,
    timer: CountdownTimer,
    mark_advance_delay: Duration,
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(at) => tokio::time::sleep_until(at).await,
        None => std::future::pending().await,
    }
}

impl SessionDriver {
    #[must_use]
    pub fn new(service: Arc<QuizSessionService>) -> Self {
        Self {
            service,
            timer: CountdownTimer::default(),
            mark_advance_delay: MARK_ADVANCE_DELAY,
        }
    }

    #[must_use]
    pub fn with_timer(mut self, timer: CountdownTimer) -> Self {
        self.timer = timer;
        self
    }

    #[must_use]
    pub fn with_mark_advance_delay(mut self, delay: Duration) -> Self {
        self.mark_advance_delay = delay;
        self
    }

    /// Drive `session` until it is submitted or abandoned.
    ///
    /// A closed command channel counts as abandonment. The countdown and any
    /// pending mark advance are cancelled on every exit path.
    ///
    /// # Errors
    ///
    /// Returns `SessionError` only if a timer tick fails; rejected commands are
    /// reported through `observe` and the loop keeps running.
    pub async fn run<F>(
        &self,
        mut session: QuizSession,
        mut commands: mpsc::UnboundedReceiver<SessionCommand>,
        mut observe: F,
    ) -> Result<DriverOutcome, SessionError>
    where
        F: FnMut(&QuizSession, SessionUpdate<'_>),
    {
        let (tick_tx, mut ticks) = mpsc::unbounded_channel();
        let mut timer = self.timer.start(tick_tx);
        let mut advance_at: Option<Instant> = None;

        observe(&session, SessionUpdate::Started);

        let outcome = loop {
            tokio::select! {
                biased;

                command = commands.recv() => {
                    let command = command.unwrap_or(SessionCommand::Exit);
                    if command == SessionCommand::Exit {
                        break DriverOutcome::Abandoned;
                    }
                    match self.apply(&mut session, command).await {
                        Ok(Applied::Completed(receipt)) => break DriverOutcome::Completed(receipt),
                        Ok(Applied::Prompt(prompt)) => {
                            observe(&session, SessionUpdate::SubmitPrompt(prompt));
                        }
                        Ok(Applied::Changed) => {
                            if command == SessionCommand::ToggleMark {
                                advance_at = session
                                    .has_pending_advance()
                                    .then(|| Instant::now() + self.mark_advance_delay);
                            } else if !session.has_pending_advance() {
                                advance_at = None;
                            }
                            observe(&session, SessionUpdate::Changed(command));
                        }
                        Err(error) => {
                            observe(&session, SessionUpdate::Rejected { command, error: &error });
                        }
                    }
                }
                () = wait_until(advance_at) => {
                    advance_at = None;
                    if session.apply_pending_advance()? {
                        observe(&session, SessionUpdate::Advanced);
                    }
                }
                Some(()) = ticks.recv() => {
                    match self.service.tick(&mut session).await? {
                        TickResult::Running { remaining } => {
                            observe(&session, SessionUpdate::Tick { remaining });
                        }
                        TickResult::Submitted(receipt) => break DriverOutcome::Completed(receipt),
                    }
                }
            }
        };

        timer.cancel();
        if matches!(outcome, DriverOutcome::Abandoned) {
            self.service.abandon(session);
        }
        Ok(outcome)
    }

    async fn apply(
        &self,
        session: &mut QuizSession,
        command: SessionCommand,
    ) -> Result<Applied, SessionError> {
        match command {
            SessionCommand::SelectAnswer(option) => {
                session.select_answer(option)?;
            }
            SessionCommand::Next => {
                session.go_next()?;
            }
            SessionCommand::Previous => {
                session.go_previous()?;
            }
            SessionCommand::JumpTo(index) => {
                session.jump_to(index)?;
            }
            SessionCommand::ToggleMark => {
                session.toggle_mark_for_review()?;
            }
            SessionCommand::RequestSubmit => {
                return session.request_submit().map(Applied::Prompt);
            }
            SessionCommand::CancelSubmit => {
                session.cancel_submit()?;
            }
            SessionCommand::ConfirmSubmit => {
                let receipt = self.service.confirm_submit(session).await?;
                return Ok(Applied::Completed(receipt));
            }
            SessionCommand::Exit => {}
        }
        Ok(Applied::Changed)
    }
}

enum Applied {
    Changed,
    Prompt(SubmitPrompt),
    Completed(SubmissionReceipt),
}
