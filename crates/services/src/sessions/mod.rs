mod countdown;
mod driver;
mod navigation;
mod progress;
mod state;
mod status;
mod submission;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::SessionError;
pub use countdown::{CountdownTimer, TickOutcome, TimerHandle, format_clock};
pub use driver::{DriverOutcome, MARK_ADVANCE_DELAY, SessionCommand, SessionDriver, SessionUpdate};
pub use navigation::MarkOutcome;
pub use progress::SessionProgress;
pub use state::{QuizSession, SessionPhase};
pub use status::{QuestionStatus, StatusCounts};
pub use submission::{Finalized, SubmitPrompt, SubmitTrigger};
pub use view::{AttemptReview, QuestionReview};
pub use workflow::{QuizSessionService, SubmissionReceipt, TickResult};
