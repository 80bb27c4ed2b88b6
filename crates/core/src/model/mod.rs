mod attempt;
mod ids;
mod question;
mod quiz;

pub use attempt::{AttemptError, QuizAttempt};
pub use ids::{AttemptId, ParseIdError, QuestionId, QuizId};
pub use question::{OPTIONS_PER_QUESTION, Question, QuestionError};
pub use quiz::{DEFAULT_TIME_LIMIT_MINUTES, Quiz, QuizError};
