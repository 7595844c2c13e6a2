//! Error types for the filter store.

use thiserror::Error;

/// Main error type for store operations.
#[derive(Debug, Error)]
pub enum SiftError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Upload failed with status {status}: {message}")]
    Upload { status: u16, message: String },

    #[error("Invalid upload payload: {0}")]
    InvalidPayload(String),

    #[error("No filtered results to copy")]
    NothingToCopy,
}

impl From<serde_json::Error> for SiftError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_data() || e.is_syntax() || e.is_eof() {
            SiftError::Deserialization(e.to_string())
        } else {
            SiftError::Serialization(e.to_string())
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, SiftError>;
