//! Store error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Backing store unreachable. Fatal to the invocation: the harness
    /// must mark the whole request failed rather than serve a partial
    /// report.
    #[error("Reference store unavailable: {0}")]
    Unavailable(String),

    #[error("Corrupt reference record: {0}")]
    Corrupt(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
