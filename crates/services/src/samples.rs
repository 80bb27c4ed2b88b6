//! Starter quizzes written into an empty store.

use crate::quiz_service::{QuestionDraft, QuizDraft};

fn question(text: &str, options: [&str; 4], correct_answer: usize) -> QuestionDraft {
    QuestionDraft {
        question: text.to_string(),
        options: options.iter().map(ToString::to_string).collect(),
        correct_answer,
    }
}

/// Drafts for the sample quizzes, oldest first.
#[must_use]
pub fn sample_drafts() -> Vec<QuizDraft> {
    vec![
        QuizDraft {
            title: "History Quiz".into(),
            time_limit: None,
            questions: vec![
                question(
                    "In which year did World War II end?",
                    ["1944", "1945", "1946", "1947"],
                    1,
                ),
                question(
                    "Who was the first President of the United States?",
                    [
                        "Thomas Jefferson",
                        "John Adams",
                        "George Washington",
                        "Benjamin Franklin",
                    ],
                    2,
                ),
            ],
        },
        QuizDraft {
            title: "Science Quiz".into(),
            time_limit: None,
            questions: vec![
                question(
                    "What is the chemical symbol for gold?",
                    ["Go", "Gd", "Au", "Ag"],
                    2,
                ),
                question(
                    "How many bones are in the adult human body?",
                    ["206", "208", "210", "212"],
                    0,
                ),
            ],
        },
        QuizDraft {
            title: "General Knowledge Quiz".into(),
            time_limit: None,
            questions: vec![
                question(
                    "What is the capital of France?",
                    ["London", "Berlin", "Paris", "Madrid"],
                    2,
                ),
                question(
                    "Which planet is known as the Red Planet?",
                    ["Venus", "Mars", "Jupiter", "Saturn"],
                    1,
                ),
            ],
        },
    ]
}
