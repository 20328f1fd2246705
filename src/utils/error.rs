//! Error types and handling
//!
//! Every failure the checker can hit is fatal for the run: the tool is
//! all-or-nothing per invocation and relies on the next scheduled run
//! instead of retrying in-process.

use std::path::PathBuf;

use thiserror::Error;

/// Checker error types
#[derive(Debug, Error)]
pub enum CheckerError {
    /// Missing or invalid configuration, reported before any I/O
    #[error("Configuration error: {0}")]
    Config(String),

    /// Migration directory could not be listed
    #[error("Failed to read migration directory {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Connection or query failure against one shard
    #[error("Database error on {database}: {source}")]
    Database {
        database: String,
        #[source]
        source: sqlx::Error,
    },

    /// Webhook delivery failed
    #[error("Notification error: {0}")]
    Notification(String),
}

impl CheckerError {
    /// Short machine-friendly identifier, used as a structured log field
    pub fn kind(&self) -> &'static str {
        match self {
            CheckerError::Config(_) => "config_error",
            CheckerError::Io { .. } => "io_error",
            CheckerError::Database { .. } => "database_error",
            CheckerError::Notification(_) => "notification_error",
        }
    }

    /// Wrap an sqlx error with the database it came from
    pub fn database(database: impl Into<String>, source: sqlx::Error) -> Self {
        CheckerError::Database {
            database: database.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for CheckerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CheckerError::Notification("Webhook request timed out".to_string())
        } else if err.is_connect() {
            CheckerError::Notification("Failed to connect to webhook endpoint".to_string())
        } else {
            CheckerError::Notification(err.to_string())
        }
    }
}

impl From<serde_json::Error> for CheckerError {
    fn from(err: serde_json::Error) -> Self {
        CheckerError::Notification(format!("JSON serialization error: {}", err))
    }
}

/// Result type alias used across the library
pub type CheckerResult<T> = Result<T, CheckerError>;
