//! Application configuration
//!
//! A run mode (`SONGBOOK_ENV`) picks one of three profiles; individual
//! settings can then be overridden through environment variables.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use thiserror::Error;

use crate::branding;

/// Environment variable selecting the run mode.
pub const ENV_MODE: &str = "SONGBOOK_ENV";
/// Overrides the profile's log directory.
pub const ENV_LOG_DIR: &str = "SONGBOOK_LOG_DIR";
/// Overrides the profile's database path (`:memory:` for an in-memory database).
pub const ENV_DATABASE: &str = "SONGBOOK_DATABASE";
/// Overrides the bind host.
pub const ENV_HOST: &str = "SONGBOOK_HOST";
/// Overrides the bind port.
pub const ENV_PORT: &str = "SONGBOOK_PORT";

/// Byte cap for every rotating log file.
pub const LOG_MAX_BYTES: u64 = 10_000_000;
/// Number of rotated backups kept per log file.
pub const LOG_BACKUP_COUNT: usize = 5;

/// Configuration errors. All of them are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unknown run mode '{0}' (expected production, development or testing)")]
    InvalidMode(String),

    #[error("invalid port '{value}': {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

/// Configuration profile selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Production,
    Development,
    Testing,
}

impl RunMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Testing => "testing",
        }
    }
}

impl FromStr for RunMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "testing" | "test" => Ok(Self::Testing),
            other => Err(ConfigError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the SQLite database lives
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    InMemory,
}

impl DatabaseLocation {
    fn parse(value: &str) -> Self {
        if value == ":memory:" {
            Self::InMemory
        } else {
            Self::File(PathBuf::from(value))
        }
    }
}

/// Resolved application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Active profile
    pub mode: RunMode,
    /// Directory holding every rotating log file
    pub log_dir: PathBuf,
    /// SQLite database location
    pub database: DatabaseLocation,
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Mark the session cookie `Secure`
    pub secure_cookies: bool,
    /// Byte cap for each rotating log file
    pub log_max_bytes: u64,
    /// Number of rotated backups per log file
    pub log_backup_count: usize,
}

impl AppConfig {
    /// Profile defaults for a run mode, before any environment override.
    pub fn for_mode(mode: RunMode) -> Self {
        let (database, host, secure_cookies) = match mode {
            RunMode::Production => (
                DatabaseLocation::File(PathBuf::from("data").join(branding::DATABASE_FILE)),
                "0.0.0.0".to_string(),
                true,
            ),
            RunMode::Development => (
                DatabaseLocation::File(PathBuf::from("data").join(branding::DATABASE_FILE)),
                "127.0.0.1".to_string(),
                false,
            ),
            RunMode::Testing => (DatabaseLocation::InMemory, "127.0.0.1".to_string(), false),
        };

        Self {
            mode,
            log_dir: PathBuf::from(branding::DEFAULT_LOG_DIR),
            database,
            host,
            port: branding::DEFAULT_PORT,
            secure_cookies,
            log_max_bytes: LOG_MAX_BYTES,
            log_backup_count: LOG_BACKUP_COUNT,
        }
    }

    /// Resolve the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup.
    ///
    /// Missing mode falls back to development.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mode = match lookup(ENV_MODE) {
            Some(value) if !value.trim().is_empty() => value.parse()?,
            _ => RunMode::Development,
        };

        let mut config = Self::for_mode(mode);

        if let Some(dir) = lookup(ENV_LOG_DIR).filter(|v| !v.is_empty()) {
            config.log_dir = PathBuf::from(dir);
        }
        if let Some(db) = lookup(ENV_DATABASE).filter(|v| !v.is_empty()) {
            config.database = DatabaseLocation::parse(&db);
        }
        if let Some(host) = lookup(ENV_HOST).filter(|v| !v.is_empty()) {
            config.host = host;
        }
        if let Some(port) = lookup(ENV_PORT).filter(|v| !v.is_empty()) {
            config.port = port
                .parse()
                .map_err(|source| ConfigError::InvalidPort { value: port, source })?;
        }

        Ok(config)
    }

    /// Use a different log directory
    pub fn with_log_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.log_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Use a different database location
    pub fn with_database(mut self, database: DatabaseLocation) -> Self {
        self.database = database;
        self
    }

    /// Host and port joined for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
