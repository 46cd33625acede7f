//! Common error types for farmlink

use thiserror::Error;

/// Common result type for farmlink operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors shared across the farmlink crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Signup attempted with an email that already has an account
    #[error("Email already exists")]
    DuplicateEmail,

    /// Unknown email or password mismatch at login
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Role or ownership mismatch
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// A required upload part was absent or empty
    #[error("Missing file: {0}")]
    MissingFile(String),

    /// The external model call failed or its reply was unusable
    #[error("Analysis failed: {0}")]
    AnalysisFailed(String),

    /// Store error while cascading a delete; the transaction was rolled back
    #[error("Deletion failed: {0}")]
    DeletionFailed(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}
