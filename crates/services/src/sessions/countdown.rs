use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use super::state::QuizSession;
use crate::error::SessionError;

/// Result of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running { remaining: u32 },
    /// The countdown reached zero; the session must be auto-submitted.
    Expired,
}

impl QuizSession {
    /// Count one elapsed second.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Completed` once the session is submitted; the
    /// countdown is frozen from then on.
    pub fn tick(&mut self) -> Result<TickOutcome, SessionError> {
        self.ensure_active()?;
        self.remaining_seconds = self.remaining_seconds.saturating_sub(1);
        if self.remaining_seconds == 0 {
            return Ok(TickOutcome::Expired);
        }
        Ok(TickOutcome::Running {
            remaining: self.remaining_seconds,
        })
    }

    /// Remaining time as `m:ss`.
    #[must_use]
    pub fn format_remaining(&self) -> String {
        format_clock(self.remaining_seconds)
    }
}

/// Formats seconds as `m:ss` (minutes are not capped at 59).
#[must_use]
pub fn format_clock(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Recurring one-second tick source for a session.
#[derive(Debug, Clone, Copy)]
pub struct CountdownTimer {
    period: Duration,
}

impl Default for CountdownTimer {
    fn default() -> Self {
        Self::new(Duration::from_secs(1))
    }
}

impl CountdownTimer {
    #[must_use]
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    #[must_use]
    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the ticking task. It sends `()` every period until cancelled or
    /// until the receiver is dropped.
    ///
    /// Missed ticks are delivered in a burst so every elapsed second is counted.
    #[must_use]
    pub fn start(&self, ticks: mpsc::UnboundedSender<()>) -> TimerHandle {
        let period = self.period;
        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Burst);
            loop {
                interval.tick().await;
                if ticks.send(()).is_err() {
                    break;
                }
            }
        });
        TimerHandle { task: Some(task) }
    }
}

/// Cancellation handle for a running [`CountdownTimer`].
///
/// Dropping the handle cancels the timer as well.
#[derive(Debug)]
pub struct TimerHandle {
    task: Option<JoinHandle<()>>,
}

impl TimerHandle {
    /// Stop scheduling further ticks.
    pub fn cancel(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("countdown timer cancelled");
        }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.task.is_none()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}
