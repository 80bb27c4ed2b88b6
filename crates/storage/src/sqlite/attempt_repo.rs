use quiz_core::model::{QuizAttempt, QuizId};

use super::SqliteRepository;
use super::mapping::{answers_to_json, map_attempt_row};
use crate::repository::{AttemptRepository, StorageError};

fn append_error(e: sqlx::Error) -> StorageError {
    match e.as_database_error() {
        Some(db) if db.is_unique_violation() => StorageError::Conflict,
        _ => StorageError::Connection(e.to_string()),
    }
}

#[async_trait::async_trait]
impl AttemptRepository for SqliteRepository {
    async fn append_attempt(&self, attempt: &QuizAttempt) -> Result<(), StorageError> {
        sqlx::query(
            r"
            INSERT INTO quiz_attempts (id, quiz_id, score, total_questions, answers, completed_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ",
        )
        .bind(attempt.id().as_str())
        .bind(attempt.quiz_id().as_str())
        .bind(i64::from(attempt.score()))
        .bind(i64::from(attempt.total_questions()))
        .bind(answers_to_json(attempt.answers())?)
        .bind(attempt.completed_at())
        .execute(&self.pool)
        .await
        .map_err(append_error)?;

        Ok(())
    }

    async fn list_attempts(
        &self,
        quiz_id: &QuizId,
        limit: u32,
    ) -> Result<Vec<QuizAttempt>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, quiz_id, score, total_questions, answers, completed_at
            FROM quiz_attempts
            WHERE quiz_id = ?1
            ORDER BY completed_at DESC, rowid DESC
            LIMIT ?2
            ",
        )
        .bind(quiz_id.as_str())
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StorageError::Connection(e.to_string()))?;

        let mut out = Vec::with_capacity(rows.len());
        for row in rows {
            out.push(map_attempt_row(&row)?);
        }
        Ok(out)
    }
}
