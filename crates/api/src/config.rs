//! Application configuration loaded from environment variables.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable, one event per line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl LogFormat {
    fn parse(value: &str) -> Self {
        if value.eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

/// Errors raised when configuration needed at startup is missing.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set; point it at the PostgreSQL document store")]
    MissingDatabaseUrl,
}

/// Server configuration with sensible defaults.
///
/// Reads from environment variables:
/// - `HOST` — bind address (default: `"0.0.0.0"`)
/// - `PORT` — listen port (default: `3000`)
/// - `RUST_LOG` — tracing filter directive (default: `"info"`)
/// - `LOG_FORMAT` — `pretty` or `json` (default: `pretty`)
/// - `DATABASE_URL` — store connection string (required to serve)
/// - `DB_NAME` — overrides the database named in `DATABASE_URL`
/// - `DB_MAX_CONNECTIONS` — pool size (default: `5`)
/// - `IMAGES_DIR` — directory served under `/images` (default: `"assets"`)
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub log_level: String,
    pub log_format: LogFormat,
    pub database_url: Option<String>,
    pub database_name: Option<String>,
    pub db_max_connections: u32,
    pub images_dir: PathBuf,
}

impl Config {
    /// Loads a `.env` file from the working directory or a parent, then reads
    /// the environment. Variables already set in the process take precedence.
    pub fn load() -> Self {
        dotenv::dotenv().ok();
        Self::from_env()
    }

    /// Like [`Config::load`], with an explicit `.env` path.
    pub fn load_from(env_file: &Path) -> Self {
        if let Err(e) = dotenv::from_path(env_file) {
            tracing::debug!(path = %env_file.display(), error = %e, "no env file loaded");
        }
        Self::from_env()
    }

    /// Loads configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            host: non_empty("HOST").unwrap_or(defaults.host),
            port: non_empty("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: non_empty("RUST_LOG").unwrap_or(defaults.log_level),
            log_format: non_empty("LOG_FORMAT")
                .map(|f| LogFormat::parse(&f))
                .unwrap_or(defaults.log_format),
            database_url: non_empty("DATABASE_URL"),
            database_name: non_empty("DB_NAME"),
            db_max_connections: non_empty("DB_MAX_CONNECTIONS")
                .and_then(|n| n.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.db_max_connections),
            images_dir: non_empty("IMAGES_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.images_dir),
        }
    }

    /// Returns the `"host:port"` bind address string.
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Returns the store connection string, or an error if it is unset.
    pub fn database_url(&self) -> Result<&str, ConfigError> {
        self.database_url
            .as_deref()
            .ok_or(ConfigError::MissingDatabaseUrl)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            database_url: None,
            database_name: None,
            db_max_connections: 5,
            images_dir: PathBuf::from("assets"),
        }
    }
}
