//! Core error types for the Portfolio Pulse dashboard.
//!
//! Most recoverable failures (provider misses, storage trouble, corrupt
//! persisted state) are absorbed at the nearest boundary and only surface as
//! freshness staleness or empty panels; these types exist for the few paths
//! that do propagate.

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Root error type for the dashboard core.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Market data operation failed: {0}")]
    MarketData(#[from] pulse_market_data::MarketDataError),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

/// Errors from the persistent key-value store.
///
/// Callers on the snapshot path treat every variant as "no history":
/// reads fall back to an empty list and writes are logged and dropped
/// (private browsing, quota).
#[derive(Error, Debug)]
pub enum StorageError {
    /// Reading a key failed.
    #[error("Failed to read key '{key}': {message}")]
    ReadFailed { key: String, message: String },

    /// Writing a key failed.
    #[error("Failed to write key '{key}': {message}")]
    WriteFailed { key: String, message: String },

    /// The persisted value did not parse into the expected shape.
    #[error("Corrupt value under key '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Validation errors for user input and data parsing.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Failed to parse date: {0}")]
    DateParse(#[from] chrono::ParseError),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Validation(ValidationError::InvalidInput(err.to_string()))
    }
}

impl From<Error> for String {
    fn from(err: Error) -> Self {
        err.to_string()
    }
}
