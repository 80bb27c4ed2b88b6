#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_service;
pub mod samples;
pub mod sessions;

pub use quiz_core::Clock;
pub use sessions as session;

pub use error::{QuizServiceError, SessionError};
pub use quiz_service::{QuestionDraft, QuizDraft, QuizService};

pub use sessions::{
    AttemptReview, CountdownTimer, DriverOutcome, QuestionReview, QuestionStatus, QuizSession,
    QuizSessionService, SessionCommand, SessionDriver, SessionPhase, SessionProgress,
    SessionUpdate, StatusCounts, SubmissionReceipt, SubmitPrompt, TickOutcome, TickResult,
    TimerHandle,
};
