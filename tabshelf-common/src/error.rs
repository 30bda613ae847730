//! Common error types for TabShelf

use thiserror::Error;

/// Common result type for TabShelf operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy surfaced by the storage engine and aggregation layer
///
/// Every variant is recoverable; the caller decides whether to retry.
#[derive(Error, Debug)]
pub enum Error {
    /// Missing, blank, or out-of-range input
    #[error("Validation error: {0}")]
    Validation(String),

    /// Referenced tab does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// A rating for this (tab, client key) pair already exists
    #[error("Duplicate rating: client {client_key:?} has already rated tab {tab_id}")]
    DuplicateRating { tab_id: i64, client_key: String },

    /// Underlying persistence failure (wraps sqlx::Error)
    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Short machine-readable code for this error kind
    pub fn code(&self) -> &'static str {
        match self {
            Error::Validation(_) => "VALIDATION_ERROR",
            Error::NotFound(_) => "NOT_FOUND",
            Error::DuplicateRating { .. } => "DUPLICATE_RATING",
            Error::Storage(_) => "STORAGE_ERROR",
            Error::Io(_) => "IO_ERROR",
            Error::Config(_) => "CONFIG_ERROR",
        }
    }
}
