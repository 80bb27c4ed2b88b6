use quiz_core::model::{Quiz, QuizAttempt};

/// Presentation-agnostic breakdown of one question in a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionReview {
    pub index: usize,
    pub question: String,
    /// Text of the chosen option; `None` when left unanswered.
    pub your_answer: Option<String>,
    pub correct_answer: String,
    pub is_correct: bool,
}

/// Result screen data for a finished attempt.
///
/// No pre-formatted strings beyond the option texts; the UI decides layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttemptReview {
    pub score: u32,
    pub total_questions: u32,
    pub percentage: u32,
    pub questions: Vec<QuestionReview>,
}

impl AttemptReview {
    /// Pair an attempt with the quiz it was taken on.
    ///
    /// Answers beyond the quiz's questions are ignored; questions without a
    /// recorded answer count as unanswered.
    #[must_use]
    pub fn build(quiz: &Quiz, attempt: &QuizAttempt) -> Self {
        let questions = quiz
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| {
                let answer = attempt.answers().get(index).copied().flatten();
                QuestionReview {
                    index,
                    question: question.text().to_owned(),
                    your_answer: answer.and_then(|a| question.option(a)).map(str::to_owned),
                    correct_answer: question
                        .option(question.correct_answer())
                        .unwrap_or_default()
                        .to_owned(),
                    is_correct: question.is_correct(answer),
                }
            })
            .collect();

        Self {
            score: attempt.score(),
            total_questions: attempt.total_questions(),
            percentage: attempt.percentage(),
            questions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sessions::state::tests::build_quiz;
    use quiz_core::model::{AttemptId, QuizId};
    use quiz_core::time::fixed_now;

    #[test]
    fn review_pairs_answers_with_correct_options() {
        let quiz = build_quiz(&[1, 2], None);
        let attempt = QuizAttempt::new(
            AttemptId::new("a1"),
            QuizId::new("quiz-1"),
            1,
            2,
            vec![Some(1), None],
            fixed_now(),
        )
        .unwrap();

        let review = AttemptReview::build(&quiz, &attempt);
        assert_eq!(review.percentage, 50);
        assert_eq!(review.questions.len(), 2);

        let first = &review.questions[0];
        assert_eq!(first.your_answer.as_deref(), Some("Q1 option 1"));
        assert_eq!(first.correct_answer, "Q1 option 1");
        assert!(first.is_correct);

        let second = &review.questions[1];
        assert_eq!(second.your_answer, None);
        assert_eq!(second.correct_answer, "Q2 option 2");
        assert!(!second.is_correct);
    }
}
