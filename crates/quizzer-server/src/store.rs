//! Relational quiz store.
//!
//! A quiz owns its questions and a CHECKBOX question owns its options. Both
//! creation and deletion of a quiz touch all three tables inside a single
//! transaction, so a quiz is either stored whole or not at all.

use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use quizzer_core::{
    CreatedQuiz, NewQuiz, OptionDraft, Question, QuestionDraft, QuestionType, Quiz, QuizOption,
    QuizSummary,
};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{FromRow, Sqlite, SqlitePool, Transaction};
use tracing::{debug, info};

use crate::error::{QuizError, Result};

// ============================================================================
// Rows
// ============================================================================

#[derive(Debug, FromRow)]
struct QuizRow {
    id: i64,
    title: String,
    description: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct QuestionRow {
    id: i64,
    question_type: String,
    question_text: String,
    correct_answer: Option<bool>,
    correct_text: Option<String>,
}

#[derive(Debug, FromRow)]
struct OptionRow {
    id: i64,
    question_id: i64,
    text: String,
    is_correct: bool,
}

#[derive(Debug, FromRow)]
struct SummaryRow {
    id: i64,
    title: String,
    number_of_questions: i64,
    created_at: DateTime<Utc>,
}

/// Number of rows in each table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowCounts {
    /// Rows in `quizzes`.
    pub quizzes: i64,
    /// Rows in `questions`.
    pub questions: i64,
    /// Rows in `options`.
    pub options: i64,
}

// ============================================================================
// QuizStore
// ============================================================================

/// Repository over the `quizzes`, `questions` and `options` tables.
#[derive(Debug, Clone)]
pub struct QuizStore {
    pool: SqlitePool,
}

impl QuizStore {
    /// Opens (creating if needed) the database at `database_url` and applies
    /// the schema migrations.
    ///
    /// In-memory URLs get a single long-lived connection, since every SQLite
    /// connection to `:memory:` is a separate database.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let in_memory = database_url.contains(":memory:") || database_url.contains("mode=memory");
        let pool_options = if in_memory {
            SqlitePoolOptions::new()
                .max_connections(1)
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(max_connections)
        };

        let pool = pool_options.connect_with(options).await?;
        let store = Self { pool };
        store.migrate().await?;

        info!(database_url, in_memory, "Quiz store ready");
        Ok(store)
    }

    /// Opens a fresh in-memory store.
    pub async fn in_memory() -> Result<Self> {
        Self::connect("sqlite::memory:", 1).await
    }

    /// Applies any pending schema migrations.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Persists a quiz with all of its questions and options.
    ///
    /// Question drafts are written as given; callers are expected to have
    /// normalized them. Everything happens in one transaction.
    pub async fn create_quiz(&self, quiz: &NewQuiz) -> Result<CreatedQuiz> {
        let now = Utc::now();
        let mut tx = self.pool.begin().await?;

        let quiz_id = sqlx::query(
            "INSERT INTO quizzes (title, description, created_at, updated_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&quiz.title)
        .bind(&quiz.description)
        .bind(now)
        .bind(now)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        for (position, question) in quiz.questions.iter().enumerate() {
            insert_question(&mut tx, quiz_id, position, question, now).await?;
        }

        tx.commit().await?;

        info!(quiz_id, questions = quiz.questions.len(), "Quiz created");

        Ok(CreatedQuiz {
            id: quiz_id,
            title: quiz.title.clone(),
            description: quiz.description.clone(),
        })
    }

    /// Lists every quiz with its question count, oldest first.
    pub async fn list_quizzes(&self) -> Result<Vec<QuizSummary>> {
        let rows = sqlx::query_as::<_, SummaryRow>(
            "SELECT q.id, q.title, q.created_at, COUNT(qs.id) AS number_of_questions
             FROM quizzes q
             LEFT JOIN questions qs ON qs.quiz_id = q.id
             GROUP BY q.id, q.title, q.created_at
             ORDER BY q.id",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let number_of_questions = u32::try_from(row.number_of_questions)
                    .map_err(|e| QuizError::corrupted_row("questions", e.to_string()))?;
                Ok(QuizSummary {
                    id: row.id,
                    title: row.title,
                    number_of_questions,
                    created_at: row.created_at,
                })
            })
            .collect()
    }

    /// Loads a quiz with its questions and options, in authoring order.
    pub async fn get_quiz(&self, id: i64) -> Result<Quiz> {
        let mut tx = self.pool.begin().await?;

        let quiz = sqlx::query_as::<_, QuizRow>(
            "SELECT id, title, description, created_at, updated_at FROM quizzes WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(QuizError::not_found(id))?;

        let questions = sqlx::query_as::<_, QuestionRow>(
            "SELECT id, question_type, question_text, correct_answer, correct_text
             FROM questions
             WHERE quiz_id = ?
             ORDER BY position, id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        let options = sqlx::query_as::<_, OptionRow>(
            "SELECT o.id, o.question_id, o.text, o.is_correct
             FROM options o
             JOIN questions q ON q.id = o.question_id
             WHERE q.quiz_id = ?
             ORDER BY o.question_id, o.position, o.id",
        )
        .bind(id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut options_by_question: HashMap<i64, Vec<QuizOption>> = HashMap::new();
        for row in options {
            options_by_question
                .entry(row.question_id)
                .or_default()
                .push(QuizOption {
                    id: row.id,
                    text: row.text,
                    is_correct: row.is_correct,
                });
        }

        let questions = questions
            .into_iter()
            .map(|row| {
                let question_type: QuestionType = row
                    .question_type
                    .parse()
                    .map_err(|e: quizzer_core::InvalidQuestionType| {
                        QuizError::corrupted_row("questions", e.to_string())
                    })?;
                Ok(Question {
                    id: row.id,
                    question_type,
                    question_text: row.question_text,
                    correct_answer: row.correct_answer,
                    correct_text: row.correct_text,
                    options: options_by_question.remove(&row.id).unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        debug!(quiz_id = id, questions = questions.len(), "Quiz loaded");

        Ok(Quiz {
            id: quiz.id,
            title: quiz.title,
            description: quiz.description,
            questions,
            created_at: quiz.created_at,
            updated_at: quiz.updated_at,
        })
    }

    /// Deletes a quiz together with its questions and their options.
    pub async fn delete_quiz(&self, id: i64) -> Result<()> {
        let mut tx = self.pool.begin().await?;

        let exists = sqlx::query_scalar::<_, i64>("SELECT id FROM quizzes WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if exists.is_none() {
            return Err(QuizError::not_found(id));
        }

        let options = sqlx::query(
            "DELETE FROM options WHERE question_id IN (SELECT id FROM questions WHERE quiz_id = ?)",
        )
        .bind(id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        let questions = sqlx::query("DELETE FROM questions WHERE quiz_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?
            .rows_affected();

        sqlx::query("DELETE FROM quizzes WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(quiz_id = id, questions, options, "Quiz deleted");
        Ok(())
    }

    /// Counts the rows of every table.
    pub async fn row_counts(&self) -> Result<RowCounts> {
        let count = |table: &str| format!("SELECT COUNT(*) FROM {table}");

        Ok(RowCounts {
            quizzes: sqlx::query_scalar(&count("quizzes"))
                .fetch_one(&self.pool)
                .await?,
            questions: sqlx::query_scalar(&count("questions"))
                .fetch_one(&self.pool)
                .await?,
            options: sqlx::query_scalar(&count("options"))
                .fetch_one(&self.pool)
                .await?,
        })
    }
}

async fn insert_question(
    tx: &mut Transaction<'_, Sqlite>,
    quiz_id: i64,
    position: usize,
    question: &QuestionDraft,
    now: DateTime<Utc>,
) -> Result<()> {
    let question_id = sqlx::query(
        "INSERT INTO questions (
            quiz_id, position, question_type, question_text, correct_answer, correct_text,
            created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(quiz_id)
    .bind(to_position(position)?)
    .bind(question.question_type.as_str())
    .bind(&question.question_text)
    .bind(question.correct_answer)
    .bind(question.correct_text.as_deref())
    .bind(now)
    .bind(now)
    .execute(&mut **tx)
    .await?
    .last_insert_rowid();

    if let Some(options) = &question.options {
        insert_options(tx, question_id, options, now).await?;
    }

    Ok(())
}

async fn insert_options(
    tx: &mut Transaction<'_, Sqlite>,
    question_id: i64,
    options: &[OptionDraft],
    now: DateTime<Utc>,
) -> Result<()> {
    for (position, option) in options.iter().enumerate() {
        sqlx::query(
            "INSERT INTO options (question_id, position, text, is_correct, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(question_id)
        .bind(to_position(position)?)
        .bind(&option.text)
        .bind(option.is_correct)
        .bind(now)
        .bind(now)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

fn to_position(position: usize) -> Result<i64> {
    i64::try_from(position).map_err(|_| QuizError::validation("Too many entries in quiz"))
}
