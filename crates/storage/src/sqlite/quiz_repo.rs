use quiz_core::model::{Question, Quiz, QuizId};
use sqlx::{Row, SqlitePool};

use super::SqliteRepository;
use super::mapping::{conn, map_question_row, map_quiz_row, options_to_json, ser, usize_to_i64};
use crate::repository::{QuizRepository, StorageError};

async fn load_questions(pool: &SqlitePool, quiz_id: &str) -> Result<Vec<Question>, StorageError> {
    let rows = sqlx::query(
        r"
        SELECT id, question, options, correct_answer
        FROM questions
        WHERE quiz_id = ?1
        ORDER BY position ASC
        ",
    )
    .bind(quiz_id)
    .fetch_all(pool)
    .await
    .map_err(conn)?;

    let mut questions = Vec::with_capacity(rows.len());
    for row in rows {
        questions.push(map_question_row(&row)?);
    }
    Ok(questions)
}

#[async_trait::async_trait]
impl QuizRepository for SqliteRepository {
    async fn upsert_quiz(&self, quiz: &Quiz) -> Result<(), StorageError> {
        let mut tx = self.pool.begin().await.map_err(conn)?;

        sqlx::query(
            r"
            INSERT INTO quizzes (id, title, created_at, updated_at, time_limit_minutes)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(id) DO UPDATE SET
                title = excluded.title,
                updated_at = excluded.updated_at,
                time_limit_minutes = excluded.time_limit_minutes
            ",
        )
        .bind(quiz.id().as_str())
        .bind(quiz.title())
        .bind(quiz.created_at())
        .bind(quiz.updated_at())
        .bind(quiz.time_limit_minutes().map(i64::from))
        .execute(&mut *tx)
        .await
        .map_err(conn)?;

        sqlx::query("DELETE FROM questions WHERE quiz_id = ?1")
            .bind(quiz.id().as_str())
            .execute(&mut *tx)
            .await
            .map_err(conn)?;

        for (position, question) in quiz.questions().iter().enumerate() {
            sqlx::query(
                r"
                INSERT INTO questions (quiz_id, position, id, question, options, correct_answer)
                VALUES (?1, ?2, ?3, ?4, ?5, ?6)
                ",
            )
            .bind(quiz.id().as_str())
            .bind(usize_to_i64("position", position)?)
            .bind(question.id().as_str())
            .bind(question.text())
            .bind(options_to_json(question.options())?)
            .bind(usize_to_i64("correct_answer", question.correct_answer())?)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }

        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn get_quiz(&self, id: &QuizId) -> Result<Option<Quiz>, StorageError> {
        let row = sqlx::query(
            r"
            SELECT id, title, created_at, updated_at, time_limit_minutes
            FROM quizzes WHERE id = ?1
            ",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(conn)?;

        match row {
            Some(row) => {
                let questions = load_questions(&self.pool, id.as_str()).await?;
                map_quiz_row(&row, questions).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn list_quizzes(&self, limit: u32) -> Result<Vec<Quiz>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT id, title, created_at, updated_at, time_limit_minutes
            FROM quizzes
            ORDER BY created_at DESC, id ASC
            LIMIT ?1
            ",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        let mut quizzes = Vec::with_capacity(rows.len());
        for row in rows {
            let id: String = row.try_get("id").map_err(ser)?;
            let questions = load_questions(&self.pool, &id).await?;
            quizzes.push(map_quiz_row(&row, questions)?);
        }
        Ok(quizzes)
    }
}
