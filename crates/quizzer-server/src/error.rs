//! Error types for the Quizzer server.
//!
//! This module defines the error hierarchy for configuration loading, the
//! quiz store and the creation service. The HTTP layer maps these onto status
//! codes in `api`.

use std::path::PathBuf;

/// A specialized `Result` type for Quizzer server operations.
pub type Result<T> = std::result::Result<T, QuizError>;

/// Errors that can occur while serving quizzes.
#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid JSON syntax in configuration file.
    #[error("Invalid JSON in config file '{path}': {message}\n\nSuggestion: Validate your quizzer.json with a JSON linter")]
    ConfigParseError {
        /// Path to the configuration file.
        path: PathBuf,
        /// Description of the parse error.
        message: String,
    },

    /// Configuration validation failed.
    #[error("Invalid configuration: {message}\n\nSuggestion: {suggestion}")]
    ConfigValidationError {
        /// Description of the validation failure.
        message: String,
        /// Actionable suggestion for the user.
        suggestion: String,
    },

    // ========================================================================
    // Request Errors
    // ========================================================================
    /// No quiz with the given identifier exists.
    #[error("Quiz not found")]
    NotFound {
        /// The identifier that was looked up.
        id: i64,
    },

    /// The create payload is malformed.
    #[error("{0}")]
    Validation(String),

    // ========================================================================
    // Storage Errors
    // ========================================================================
    /// A database operation failed.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying the schema migrations failed.
    #[error("Failed to apply database migrations: {0}\n\nSuggestion: Check that databaseUrl points at a writable SQLite file")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row could not be turned back into a quiz.
    #[error("Corrupted row in table '{table}': {message}")]
    CorruptedRow {
        /// Table holding the row.
        table: &'static str,
        /// What was wrong with it.
        message: String,
    },

    // ========================================================================
    // General I/O Errors
    // ========================================================================
    /// General I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl QuizError {
    /// Creates a new `ConfigParseError` with the given path and message.
    #[must_use]
    pub fn config_parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigParseError {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Creates a new `ConfigValidationError` with the given message and suggestion.
    #[must_use]
    pub fn config_validation(message: impl Into<String>, suggestion: impl Into<String>) -> Self {
        Self::ConfigValidationError {
            message: message.into(),
            suggestion: suggestion.into(),
        }
    }

    /// Creates a new `NotFound` error.
    #[must_use]
    pub const fn not_found(id: i64) -> Self {
        Self::NotFound { id }
    }

    /// Creates a new `Validation` error.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Creates a new `CorruptedRow` error.
    #[must_use]
    pub fn corrupted_row(table: &'static str, message: impl Into<String>) -> Self {
        Self::CorruptedRow {
            table,
            message: message.into(),
        }
    }

    /// Returns `true` if the error was caused by the request rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(self, Self::NotFound { .. } | Self::Validation(_))
    }
}
