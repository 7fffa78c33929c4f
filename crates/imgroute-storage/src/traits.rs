//! Storage abstraction trait
//!
//! This module defines the Storage trait that all storage backends must implement.

use async_trait::async_trait;
use bytes::Bytes;
use imgroute_core::AppError;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Download failed: {0}")]
    DownloadFailed(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Unknown storage backend: {0}")]
    UnknownBackend(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            // A key that escapes the root names nothing we serve
            StorageError::InvalidKey(reason) => AppError::NotFound(reason),
            other => AppError::StorageUnavailable(other.to_string()),
        }
    }
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage abstraction trait
///
/// Backends are read-only from the image server's point of view. A key names
/// a logical object without suffix; the backend decides which concrete object
/// (`key` + one of its allowed suffixes) answers it.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Read the object behind `key`.
    ///
    /// Returns `Ok(None)` when no object exists for any allowed suffix.
    async fn read(&self, key: &str) -> StorageResult<Option<Bytes>>;

    /// Get the storage backend type (`file`, `s3`, ...)
    fn backend_type(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgroute_core::ErrorMetadata;

    #[test]
    fn test_storage_errors_are_not_found_to_clients() {
        let invalid: AppError = StorageError::InvalidKey("..".to_string()).into();
        assert!(matches!(invalid, AppError::NotFound(_)));

        let backend: AppError = StorageError::DownloadFailed("timeout".to_string()).into();
        assert!(matches!(backend, AppError::StorageUnavailable(_)));
        assert_eq!(backend.http_status_code(), 404);
    }
}
