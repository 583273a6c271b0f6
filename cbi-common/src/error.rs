//! Common error types for CBI

use thiserror::Error;

/// Common result type for CBI operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across CBI modules
///
/// The workflow distinguishes expected, recoverable outcomes (`NotFound`,
/// `MalformedResponse`) from transport failures and operator input problems.
/// None of these abort the inspection flow; they are absorbed into
/// step-local messages or the terminal result by the workflow controller.
#[derive(Error, Debug)]
pub enum Error {
    /// Requested resource or lookup subject not found (expected, recoverable)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Network unreachable, connection refused, or timeout
    #[error("Transport error: {0}")]
    Transport(String),

    /// A service responded, but with nothing usable (bad JSON, no detection)
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Invalid operator input or a guard-condition failure
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// An operation of the same kind is already in flight
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}
