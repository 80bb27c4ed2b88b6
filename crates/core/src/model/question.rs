use thiserror::Error;

use crate::model::ids::QuestionId;

/// Every question offers exactly this many options.
pub const OPTIONS_PER_QUESTION: usize = 4;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum QuestionError {
    #[error("question text cannot be empty")]
    EmptyText,

    #[error("expected {expected} options, got {actual}")]
    WrongOptionCount { expected: usize, actual: usize },

    #[error("option {index} cannot be empty")]
    EmptyOption { index: usize },

    #[error("correct answer {index} is out of range for {len} options")]
    CorrectAnswerOutOfRange { index: usize, len: usize },
}

//
// ─── QUESTION ──────────────────────────────────────────────────────────────────
//

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    id: QuestionId,
    text: String,
    options: Vec<String>,
    correct_answer: usize,
}

impl Question {
    /// Creates a validated question.
    ///
    /// # Errors
    ///
    /// Returns `QuestionError` if the text or any option is blank, the option count
    /// is not [`OPTIONS_PER_QUESTION`], or `correct_answer` does not index an option.
    pub fn new(
        id: QuestionId,
        text: impl Into<String>,
        options: Vec<String>,
        correct_answer: usize,
    ) -> Result<Self, QuestionError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(QuestionError::EmptyText);
        }
        if options.len() != OPTIONS_PER_QUESTION {
            return Err(QuestionError::WrongOptionCount {
                expected: OPTIONS_PER_QUESTION,
                actual: options.len(),
            });
        }
        if let Some(index) = options.iter().position(|o| o.trim().is_empty()) {
            return Err(QuestionError::EmptyOption { index });
        }
        if correct_answer >= options.len() {
            return Err(QuestionError::CorrectAnswerOutOfRange {
                index: correct_answer,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            text,
            options,
            correct_answer,
        })
    }

    #[must_use]
    pub fn id(&self) -> &QuestionId {
        &self.id
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn options(&self) -> &[String] {
        &self.options
    }

    /// Option text at `index`, if it exists.
    #[must_use]
    pub fn option(&self, index: usize) -> Option<&str> {
        self.options.get(index).map(String::as_str)
    }

    #[must_use]
    pub fn correct_answer(&self) -> usize {
        self.correct_answer
    }

    /// True when `answer` is a selected option equal to the correct one.
    #[must_use]
    pub fn is_correct(&self, answer: Option<usize>) -> bool {
        answer == Some(self.correct_answer)
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
