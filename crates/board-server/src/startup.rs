//! Startup steps that must succeed before the server accepts requests.

use crate::config::{ConfigError, DatabaseConfig};
use board_db::{DbPool, MigrationError, PoolError};
use std::net::SocketAddr;
use thiserror::Error;

/// Errors that abort server startup.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("database pool: {0}")]
    Pool(#[from] PoolError),
    #[error("no connection available for migrations: {0}")]
    Checkout(#[from] r2d2::Error),
    #[error("database migrations: {0}")]
    Migration(#[from] MigrationError),
    #[error("failed to bind {addr} (is another process using this port?): {source}")]
    Bind {
        addr: SocketAddr,
        source: std::io::Error,
    },
    #[error("server stopped with an error: {0}")]
    Serve(std::io::Error),
}

/// Opens the configured database and brings its schema up to date.
///
/// The returned pool is ready to hand to [`crate::AppState`].
pub fn open_database(config: &DatabaseConfig) -> Result<DbPool, StartupError> {
    let pool = board_db::create_pool(&config.path, config.runtime_settings())?;

    let conn = pool.get()?;
    let applied = board_db::run_migrations(&conn)?;
    if applied > 0 {
        tracing::info!(count = applied, path = %config.path, "applied database migrations");
    }
    drop(conn);

    Ok(pool)
}
