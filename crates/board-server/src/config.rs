//! Server configuration loading from file and environment variables.

use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};
use thiserror::Error;

/// Top-level server configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server network settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Network configuration for the HTTP server.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to.
    #[serde(default = "default_host")]
    pub host: IpAddr,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Directory served under `/frontend` when it exists.
    #[serde(default = "default_frontend_dir")]
    pub frontend_dir: String,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file, or `:memory:`.
    #[serde(default = "default_db_path")]
    pub path: String,

    /// SQLite busy timeout, in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Maximum number of pooled connections.
    #[serde(default = "default_pool_max_size")]
    pub pool_max_size: u32,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "board_server=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_host() -> IpAddr {
    IpAddr::V4(Ipv4Addr::new(127, 0, 0, 1))
}

fn default_port() -> u16 {
    8000
}

fn default_frontend_dir() -> String {
    "frontend".to_string()
}

fn default_db_path() -> String {
    "app.db".to_string()
}

fn default_busy_timeout_ms() -> u64 {
    board_db::DbRuntimeSettings::default().busy_timeout_ms
}

fn default_pool_max_size() -> u32 {
    board_db::DbRuntimeSettings::default().pool_max_size
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            frontend_dir: default_frontend_dir(),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
            busy_timeout_ms: default_busy_timeout_ms(),
            pool_max_size: default_pool_max_size(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

impl DatabaseConfig {
    /// Pool tunables in the form `board-db` expects.
    pub fn runtime_settings(&self) -> board_db::DbRuntimeSettings {
        board_db::DbRuntimeSettings {
            busy_timeout_ms: self.busy_timeout_ms,
            pool_max_size: self.pool_max_size,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `BOARD_HOST` overrides `server.host`
/// - `BOARD_PORT` overrides `server.port`
/// - `BOARD_FRONTEND_DIR` overrides `server.frontend_dir`
/// - `BOARD_DB_PATH` overrides `database.path`
/// - `BOARD_LOG_LEVEL` overrides `logging.level`
/// - `BOARD_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let config = load_config_file(path)?;
    Ok(apply_env_overrides(config, |key| std::env::var(key).ok()))
}

fn load_config_file(path: Option<&str>) -> Result<Config, ConfigError> {
    match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => Ok(toml::from_str(&contents)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Ok(Config::default())
            }
            Err(e) => Err(ConfigError::FileRead(e)),
        },
        None => Ok(Config::default()),
    }
}

/// Applies `BOARD_*` overrides using `lookup` to read variables.
///
/// Values that fail to parse are ignored and the existing setting is kept.
pub fn apply_env_overrides<F>(mut config: Config, lookup: F) -> Config
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(host) = lookup("BOARD_HOST") {
        if let Ok(parsed) = host.parse() {
            config.server.host = parsed;
        }
    }
    if let Some(port) = lookup("BOARD_PORT") {
        if let Ok(parsed) = port.parse() {
            config.server.port = parsed;
        }
    }
    if let Some(dir) = lookup("BOARD_FRONTEND_DIR") {
        config.server.frontend_dir = dir;
    }
    if let Some(db_path) = lookup("BOARD_DB_PATH") {
        config.database.path = db_path;
    }
    if let Some(level) = lookup("BOARD_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("BOARD_LOG_JSON") {
        config.logging.json = json == "true" || json == "1";
    }

    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let config = load_config_file(path.to_str()).unwrap();
        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, default_host());
        assert_eq!(config.database.path, "app.db");
        assert_eq!(config.database.pool_max_size, 8);
        assert_eq!(config.logging.level, "info");
        assert!(!config.logging.json);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[database]\npath = \"board.db\"\nbusy_timeout_ms = 250"
        )
        .unwrap();

        let config = load_config_file(file.path().to_str()).unwrap();
        assert_eq!(config.server.port, 9100);
        assert_eq!(config.server.frontend_dir, "frontend");
        assert_eq!(config.database.path, "board.db");
        assert_eq!(config.database.runtime_settings().busy_timeout_ms, 250);
        assert_eq!(config.database.runtime_settings().pool_max_size, 8);
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = load_config_file(file.path().to_str()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn env_overrides_replace_file_values() {
        let vars: HashMap<&str, &str> = [
            ("BOARD_HOST", "0.0.0.0"),
            ("BOARD_PORT", "8080"),
            ("BOARD_DB_PATH", ":memory:"),
            ("BOARD_FRONTEND_DIR", "/srv/board"),
            ("BOARD_LOG_LEVEL", "debug"),
            ("BOARD_LOG_JSON", "1"),
        ]
        .into_iter()
        .collect();

        let config = apply_env_overrides(Config::default(), |key| {
            vars.get(key).map(|v| v.to_string())
        });

        assert_eq!(config.server.host.to_string(), "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.frontend_dir, "/srv/board");
        assert_eq!(config.database.path, ":memory:");
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn unparsable_env_values_are_ignored() {
        let config = apply_env_overrides(Config::default(), |key| match key {
            "BOARD_PORT" => Some("not-a-port".to_string()),
            "BOARD_HOST" => Some("mars".to_string()),
            _ => None,
        });

        assert_eq!(config.server.port, 8000);
        assert_eq!(config.server.host, default_host());
    }
}
