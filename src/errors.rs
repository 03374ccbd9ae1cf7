//! Unified application error type.
//! All modules (db, core, cli, git) return AppError to keep the error
//! handling consistent and easy to manage.

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // IO
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    // ---------------------------
    // Database-related
    // ---------------------------
    #[error("Storage failure while {context}: {source}")]
    Storage {
        context: String,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // Session lifecycle
    // ---------------------------
    #[error("A task session is already active; stop or pause it first")]
    AlreadyActive,

    #[error("No active task session")]
    NoActiveSession,

    #[error("Session #{0} is still active; stop it first to calculate durations")]
    SessionStillActive(i64),

    #[error("Session #{0} not found")]
    RecordNotFound(i64),

    // ---------------------------
    // Version control
    // ---------------------------
    #[error("Version control error: {0}")]
    VersionControl(String),

    // ---------------------------
    // Parsing / input errors
    // ---------------------------
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // ---------------------------
    // Config errors
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to load configuration")]
    ConfigLoad,

    // ---------------------------
    // Export errors
    // ---------------------------
    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

impl From<rusqlite::Error> for AppError {
    fn from(source: rusqlite::Error) -> Self {
        AppError::Storage {
            context: "running a database query".to_string(),
            source,
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<serde_yaml::Error> for AppError {
    fn from(e: serde_yaml::Error) -> Self {
        AppError::Config(e.to_string())
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Attach a short description of the failing step to a rusqlite error.
pub trait StorageContext<T> {
    fn storage_context(self, context: &str) -> AppResult<T>;
}

impl<T> StorageContext<T> for Result<T, rusqlite::Error> {
    fn storage_context(self, context: &str) -> AppResult<T> {
        self.map_err(|source| AppError::Storage {
            context: context.to_string(),
            source,
        })
    }
}

/// True when a rusqlite error is a UNIQUE / constraint violation.
pub fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
