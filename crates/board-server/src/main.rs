//! Mars Board server binary.
//!
//! Usage: `board-server [CONFIG_PATH]`. Without an argument the path comes
//! from `BOARD_CONFIG_PATH`, then `config.toml`. A missing file means
//! defaults.

use board_server::config::{self, LoggingConfig};
use board_server::{app, open_database, AppState, StartupError};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "config.toml";

fn config_path() -> String {
    let non_blank = |path: &String| !path.trim().is_empty();
    std::env::args()
        .nth(1)
        .filter(non_blank)
        .or_else(|| std::env::var("BOARD_CONFIG_PATH").ok().filter(non_blank))
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = EnvFilter::try_new(&logging.level).unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}

#[tokio::main]
async fn main() -> Result<(), StartupError> {
    let config_path = config_path();
    let config = config::load_config(Some(config_path.as_str()))?;
    init_tracing(&config.logging);
    tracing::debug!(path = %config_path, ?config, "configuration loaded");

    let pool = open_database(&config.database)?;
    let state = AppState {
        pool,
        frontend_dir: config.server.frontend_dir,
    };

    let addr = SocketAddr::new(config.server.host, config.server.port);
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| StartupError::Bind { addr, source })?;
    tracing::info!(%addr, db = %config.database.path, "mars board listening");

    axum::serve(listener, app(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(StartupError::Serve)?;

    tracing::info!("mars board server stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM. A handler that cannot be installed is
/// logged and never fires.
async fn shutdown_signal() {
    tokio::select! {
        () = interrupt() => tracing::info!("received SIGINT, draining connections"),
        () = terminate() => tracing::info!("received SIGTERM, draining connections"),
    }
}

async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{signal, SignalKind};

    match signal(SignalKind::terminate()) {
        Ok(mut sigterm) => {
            sigterm.recv().await;
        }
        Err(e) => {
            tracing::warn!(error = %e, "cannot listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
