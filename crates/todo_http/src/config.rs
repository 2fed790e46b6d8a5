//! Server configuration from environment variables.
//!
//! | variable         | default              |
//! |------------------|----------------------|
//! | `TODO_DB_PATH`   | `todoApplication.db` |
//! | `TODO_HOST`      | `127.0.0.1`          |
//! | `TODO_PORT`      | `3000`               |
//! | `TODO_LOG_LEVEL` | build-mode default   |
//! | `TODO_LOG_DIR`   | unset (stderr)       |
//!
//! Empty values count as unset.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "todoApplication.db";
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub log_level: String,
    /// Absolute directory for rotating log files; `None` logs to stderr.
    pub log_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidPort(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPort(value) => {
                write!(f, "TODO_PORT must be an integer in 0..=65535, got `{value}`")
            }
        }
    }
}

impl Error for ConfigError {}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            log_level: todo_core::default_log_level().to_string(),
            log_dir: None,
        }
    }
}

impl ServerConfig {
    /// Reads configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };
        let defaults = Self::default();

        let port = match read("TODO_PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => defaults.port,
        };

        Ok(Self {
            db_path: read("TODO_DB_PATH").map_or(defaults.db_path, PathBuf::from),
            host: read("TODO_HOST").unwrap_or(defaults.host),
            port,
            log_level: read("TODO_LOG_LEVEL").unwrap_or(defaults.log_level),
            log_dir: read("TODO_LOG_DIR"),
        })
    }

    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
