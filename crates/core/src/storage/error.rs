//! Storage error types.

use thiserror::Error;

/// Errors raised by the artifact store.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Backend configuration is invalid.
    #[error("Storage configuration error: {0}")]
    Configuration(String),

    /// The requested artifact does not exist.
    #[error("Artifact not found: {0}")]
    NotFound(String),

    /// Backend I/O failure.
    #[error("Storage backend error: {0}")]
    Backend(String),
}

impl StorageError {
    /// Builds a configuration error.
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

impl From<opendal::Error> for StorageError {
    fn from(e: opendal::Error) -> Self {
        if e.kind() == opendal::ErrorKind::NotFound {
            Self::NotFound(e.to_string())
        } else {
            Self::Backend(e.to_string())
        }
    }
}

impl From<StorageError> for tresor_shared::AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(msg) => Self::NotFound(msg),
            other => Self::Storage(other.to_string()),
        }
    }
}
