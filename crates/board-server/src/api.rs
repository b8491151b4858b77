//! Question API handlers.

use crate::AppState;
use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use board_questions::{create_question, get_question, list_questions, QuestionError};
use board_types::{NewQuestion, Question, ValidationError};
use rusqlite::Connection;
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;

/// Request body for `POST /question`.
#[derive(Debug, Deserialize)]
pub struct CreateQuestionRequest {
    /// Question title; trimmed, 1..=200 characters.
    pub subject: String,
    /// Question body; trimmed, must not be empty.
    pub content: String,
}

/// API error type mapping to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid input: {0}")]
    BadRequest(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("internal server error: {0}")]
    InternalServerError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::InternalServerError(msg) => {
                tracing::error!(error = %msg, "request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        let body = Json(serde_json::json!({
            "error": message
        }));

        (status, body).into_response()
    }
}

impl From<QuestionError> for ApiError {
    fn from(e: QuestionError) -> Self {
        match e {
            QuestionError::NotFound(_) => ApiError::NotFound(e.to_string()),
            QuestionError::Database(_) => ApiError::InternalServerError(e.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

/// Runs `f` on the blocking pool with a connection checked out for it.
///
/// The connection goes back to the pool when `f` returns.
pub(crate) async fn with_conn<T, F>(state: Arc<AppState>, f: F) -> Result<T, ApiError>
where
    F: FnOnce(&Connection) -> Result<T, ApiError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(move || {
        let conn = state
            .pool
            .get()
            .map_err(|e| ApiError::InternalServerError(format!("db connection failed: {}", e)))?;
        f(&conn)
    })
    .await
    .map_err(|e| ApiError::InternalServerError(format!("task join error: {}", e)))?
}

/// Handler for `GET /question`.
pub async fn list_questions_handler(
    Extension(state): Extension<Arc<AppState>>,
) -> Result<Json<Vec<Question>>, ApiError> {
    let questions = with_conn(state, |conn| Ok(list_questions(conn)?)).await?;
    Ok(Json(questions))
}

/// Handler for `POST /question`.
///
/// Responds `201 Created` with the stored question.
pub async fn create_question_handler(
    Extension(state): Extension<Arc<AppState>>,
    Json(payload): Json<CreateQuestionRequest>,
) -> Result<(StatusCode, Json<Question>), ApiError> {
    let new = NewQuestion::new(&payload.subject, &payload.content)?;

    let question = with_conn(state, move |conn| Ok(create_question(conn, &new)?)).await?;

    tracing::info!(question_id = question.id, "question created");
    Ok((StatusCode::CREATED, Json(question)))
}

/// Handler for `GET /question/{id}`.
pub async fn get_question_handler(
    Extension(state): Extension<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<Question>, ApiError> {
    let question = with_conn(state, move |conn| Ok(get_question(conn, id)?)).await?;
    Ok(Json(question))
}
