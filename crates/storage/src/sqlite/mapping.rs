use quiz_core::model::{AttemptId, Question, QuestionId, Quiz, QuizAttempt, QuizId};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn(e: sqlx::Error) -> StorageError {
    StorageError::Connection(e.to_string())
}

pub(crate) fn usize_to_i64(field: &'static str, v: usize) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

fn i64_to_usize(field: &'static str, v: i64) -> Result<usize, StorageError> {
    usize::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn i64_to_u32(field: &'static str, v: i64) -> Result<u32, StorageError> {
    u32::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} out of range")))
}

/// Options are stored as a JSON array of strings.
pub(crate) fn options_to_json(options: &[String]) -> Result<String, StorageError> {
    serde_json::to_string(options).map_err(ser)
}

/// Answers are stored as a JSON array; `null` marks an unanswered question.
pub(crate) fn answers_to_json(answers: &[Option<usize>]) -> Result<String, StorageError> {
    serde_json::to_string(answers).map_err(ser)
}

pub(crate) fn map_question_row(row: &SqliteRow) -> Result<Question, StorageError> {
    let options_json: String = row.try_get("options").map_err(ser)?;
    let options: Vec<String> = serde_json::from_str(&options_json).map_err(ser)?;

    Question::new(
        QuestionId::new(row.try_get::<String, _>("id").map_err(ser)?),
        row.try_get::<String, _>("question").map_err(ser)?,
        options,
        i64_to_usize(
            "correct_answer",
            row.try_get::<i64, _>("correct_answer").map_err(ser)?,
        )?,
    )
    .map_err(ser)
}

pub(crate) fn map_quiz_row(row: &SqliteRow, questions: Vec<Question>) -> Result<Quiz, StorageError> {
    let time_limit = row
        .try_get::<Option<i64>, _>("time_limit_minutes")
        .map_err(ser)?
        .map(|v| i64_to_u32("time_limit_minutes", v))
        .transpose()?;

    Quiz::from_persisted(
        QuizId::new(row.try_get::<String, _>("id").map_err(ser)?),
        row.try_get::<String, _>("title").map_err(ser)?,
        questions,
        row.try_get("created_at").map_err(ser)?,
        row.try_get("updated_at").map_err(ser)?,
        time_limit,
    )
    .map_err(ser)
}

pub(crate) fn map_attempt_row(row: &SqliteRow) -> Result<QuizAttempt, StorageError> {
    let answers_json: String = row.try_get("answers").map_err(ser)?;
    let answers: Vec<Option<usize>> = serde_json::from_str(&answers_json).map_err(ser)?;

    QuizAttempt::new(
        AttemptId::new(row.try_get::<String, _>("id").map_err(ser)?),
        QuizId::new(row.try_get::<String, _>("quiz_id").map_err(ser)?),
        i64_to_u32("score", row.try_get::<i64, _>("score").map_err(ser)?)?,
        i64_to_u32(
            "total_questions",
            row.try_get::<i64, _>("total_questions").map_err(ser)?,
        )?,
        answers,
        row.try_get("completed_at").map_err(ser)?,
    )
    .map_err(ser)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answers_json_uses_null_for_unanswered() {
        let json = answers_to_json(&[Some(1), None, Some(0)]).unwrap();
        assert_eq!(json, "[1,null,0]");
    }
}
