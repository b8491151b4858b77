//! Database layer for the Mars Board service.
//!
//! Provides SQLite connection pooling (via `r2d2`), WAL-mode initialization
//! and embedded SQL migrations. The `question` table, like every other
//! schema object, is created through versioned migrations managed by this
//! crate rather than ad hoc `CREATE TABLE` calls at startup.

mod migrations;
mod pool;

pub use migrations::{applied_migrations, run_migrations, MigrationError};
pub use pool::{create_pool, DbPool, DbRuntimeSettings, PoolError, IN_MEMORY};
