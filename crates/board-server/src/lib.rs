//! Mars Board server library logic.
//!
//! Wires the question repository into an `axum` router. Handlers receive
//! the shared [`AppState`] through an `Extension` layer and check out one
//! pooled SQLite connection per request.

pub mod api;
pub mod config;
mod startup;

use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Extension},
    http::Request,
    routing::get,
    Json, Router,
};
use board_db::DbPool;
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub use startup::{open_database, StartupError};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: DbPool,
    /// Directory of static frontend files served under `/frontend`.
    pub frontend_dir: String,
}

/// Route prefixes the question API is mounted under.
///
/// Both forms are served so clients written against either keep working.
pub const QUESTION_PREFIXES: [&str; 2] = ["/question", "/api/question"];

/// Maximum request body size (1 MiB).
pub const MAX_REQUEST_BODY_BYTES: usize = 1024 * 1024;

/// Health check handler.
async fn health(Extension(state): Extension<Arc<AppState>>) -> Result<Json<Value>, api::ApiError> {
    let questions =
        api::with_conn(state, |conn| Ok(board_questions::count_questions(conn)?)).await?;

    Ok(Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "questions": questions
    })))
}

/// Builds the application router with all routes.
pub fn app(state: AppState) -> Router {
    let mut router = Router::new().route("/health", get(health));

    for prefix in QUESTION_PREFIXES {
        router = router
            .route(
                prefix,
                get(api::list_questions_handler).post(api::create_question_handler),
            )
            .route(&format!("{prefix}/{{id}}"), get(api::get_question_handler));
    }

    let router = if Path::new(&state.frontend_dir).is_dir() {
        tracing::info!(path = %state.frontend_dir, "serving frontend static files at /frontend");
        router.nest_service("/frontend", ServeDir::new(&state.frontend_dir))
    } else {
        tracing::info!(path = %state.frontend_dir, "frontend directory not found, skipping static file serving");
        router
    };

    router
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                    request_id = %uuid::Uuid::new_v4(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(Extension(Arc::new(state)))
}
