//! Question persistence for the Mars Board service.
//!
//! Thin repository functions over a borrowed `rusqlite::Connection`. Callers
//! own the connection (normally one checked out of the `board-db` pool for
//! the duration of a request), so every function here is synchronous and
//! must run off the async runtime.

use board_types::{NewQuestion, Question};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use thiserror::Error;

/// Errors that can occur during question operations.
#[derive(Debug, Error)]
pub enum QuestionError {
    /// A SQLite statement failed.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// No question has the given id.
    #[error("question not found: {0}")]
    NotFound(i64),
}

const SELECT_COLUMNS: &str = "SELECT id, subject, content, create_date FROM question";

/// Stores a new question and returns it as persisted.
///
/// `create_date` is stamped here with the current UTC time.
pub fn create_question(conn: &Connection, new: &NewQuestion) -> Result<Question, QuestionError> {
    conn.execute(
        "INSERT INTO question (subject, content, create_date) VALUES (?1, ?2, ?3)",
        params![new.subject(), new.content(), Utc::now()],
    )?;
    let id = conn.last_insert_rowid();

    tracing::debug!(question_id = id, "question created");

    // Read back what the store actually holds.
    get_question(conn, id)
}

/// Retrieves a question by id.
pub fn get_question(conn: &Connection, id: i64) -> Result<Question, QuestionError> {
    conn.query_row(
        &format!("{SELECT_COLUMNS} WHERE id = ?1"),
        [id],
        map_row_to_question,
    )
    .optional()?
    .ok_or(QuestionError::NotFound(id))
}

/// Lists every question, newest first.
pub fn list_questions(conn: &Connection) -> Result<Vec<Question>, QuestionError> {
    let mut stmt = conn.prepare(&format!("{SELECT_COLUMNS} ORDER BY id DESC"))?;

    let rows = stmt.query_map([], map_row_to_question)?;
    let mut questions = Vec::new();
    for row in rows {
        questions.push(row?);
    }
    Ok(questions)
}

/// Returns the number of stored questions.
pub fn count_questions(conn: &Connection) -> Result<i64, QuestionError> {
    let count = conn.query_row("SELECT COUNT(*) FROM question", [], |row| row.get(0))?;
    Ok(count)
}

fn map_row_to_question(row: &Row) -> rusqlite::Result<Question> {
    Ok(Question {
        id: row.get(0)?,
        subject: row.get(1)?,
        content: row.get(2)?,
        create_date: row.get(3)?,
    })
}
