//! Error types for the chat service.

use thiserror::Error;

/// Closed classification of every failure the service can produce.
///
/// The web layer maps each kind to one response category; callers match on
/// it exhaustively instead of inspecting error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or missing input, field-constraint violation.
    Validation,
    /// Resource absent.
    NotFound,
    /// Duplicate email or username.
    Conflict,
    /// Missing, invalid or expired credentials.
    Unauthenticated,
    /// Authenticated but not the resource owner.
    Forbidden,
    /// Hashing, signing or storage failure not attributable to the caller.
    Internal,
}

/// Common error type for the chat service.
#[derive(Error, Debug)]
pub enum ChatError {
    /// Database error.
    ///
    /// Wraps errors from the database driver. Errors from sqlx are converted
    /// automatically, except unique-constraint violations which become
    /// [`ChatError::Conflict`].
    #[error("database error: {0}")]
    Database(String),

    /// Database connection error.
    #[error("database connection error: {0}")]
    DatabaseConnection(String),

    /// A storage-level uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Permission denied error.
    #[error("permission denied: {0}")]
    Permission(String),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ChatError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ChatError::Validation(_) => ErrorKind::Validation,
            ChatError::NotFound(_) => ErrorKind::NotFound,
            ChatError::Conflict(_) => ErrorKind::Conflict,
            ChatError::Permission(_) => ErrorKind::Forbidden,
            ChatError::Database(_)
            | ChatError::DatabaseConnection(_)
            | ChatError::Io(_)
            | ChatError::Config(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for ChatError {
    fn from(e: sqlx::Error) -> Self {
        match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                ChatError::Conflict(db.message().to_string())
            }
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                ChatError::DatabaseConnection(e.to_string())
            }
            _ => ChatError::Database(e.to_string()),
        }
    }
}

/// Result type alias for chat service operations.
pub type Result<T> = std::result::Result<T, ChatError>;
