//! Storage error types.

use thiserror::Error;

/// Errors from the storage service.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Provider could not be initialized from configuration.
    #[error("storage configuration error: {0}")]
    Configuration(String),

    /// Write to the backing store failed.
    #[error("storage write failed: {0}")]
    Write(String),
}

impl From<opendal::Error> for StorageError {
    fn from(e: opendal::Error) -> Self {
        Self::Write(e.to_string())
    }
}
