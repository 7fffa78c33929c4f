//! Error types module
//!
//! `AppError` is the per-request error taxonomy. Every failure that can occur
//! while resolving one image request is funnelled into it, and `ErrorMetadata`
//! tells the HTTP boundary how to present and log each variant. The boundary
//! never exposes error detail to clients: most variants collapse into a plain
//! "not found" so callers cannot tell a malformed path, a configuration gap, a
//! forbidden transform or an unreadable object apart.

use crate::config::ConfigError;
use crate::key::KeyError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like malformed paths
    Debug,
    /// Warning level - for operator-facing gaps like missing routes
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "CONFIG_NOT_FOUND"), used in logs only
    fn error_code(&self) -> &'static str;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Malformed key: {0}")]
    MalformedKey(#[from] KeyError),

    #[error("Config not found: {0}")]
    ConfigNotFound(String),

    #[error("Transform not allowed: {0}")]
    ForbiddenTransform(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Decode failure: {0}")]
    DecodeFailure(String),

    #[error("Unknown transform: {0}")]
    UnknownTransform(String),

    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    #[error("Encode failure: {0}")]
    EncodeFailure(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::ConfigNotFound(err.to_string())
    }
}

impl AppError {
    /// Variant name for structured logs
    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::MalformedKey(_) => "MalformedKey",
            AppError::ConfigNotFound(_) => "ConfigNotFound",
            AppError::ForbiddenTransform(_) => "ForbiddenTransform",
            AppError::NotFound(_) => "NotFound",
            AppError::StorageUnavailable(_) => "StorageUnavailable",
            AppError::DecodeFailure(_) => "DecodeFailure",
            AppError::UnknownTransform(_) => "UnknownTransform",
            AppError::InvalidOptions(_) => "InvalidOptions",
            AppError::EncodeFailure(_) => "EncodeFailure",
            AppError::Internal(_) => "Internal",
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        match self {
            AppError::MalformedKey(_)
            | AppError::ConfigNotFound(_)
            | AppError::ForbiddenTransform(_)
            | AppError::NotFound(_)
            | AppError::StorageUnavailable(_)
            | AppError::DecodeFailure(_) => 404,
            AppError::UnknownTransform(_) | AppError::InvalidOptions(_) => 400,
            AppError::EncodeFailure(_) | AppError::Internal(_) => 500,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MalformedKey(_) => "MALFORMED_KEY",
            AppError::ConfigNotFound(_) => "CONFIG_NOT_FOUND",
            AppError::ForbiddenTransform(_) => "FORBIDDEN_TRANSFORM",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::StorageUnavailable(_) => "STORAGE_UNAVAILABLE",
            AppError::DecodeFailure(_) => "DECODE_FAILURE",
            AppError::UnknownTransform(_) => "UNKNOWN_TRANSFORM",
            AppError::InvalidOptions(_) => "INVALID_OPTIONS",
            AppError::EncodeFailure(_) => "ENCODE_FAILURE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn log_level(&self) -> LogLevel {
        match self {
            AppError::MalformedKey(_)
            | AppError::ForbiddenTransform(_)
            | AppError::NotFound(_)
            | AppError::UnknownTransform(_)
            | AppError::InvalidOptions(_) => LogLevel::Debug,
            AppError::ConfigNotFound(_)
            | AppError::StorageUnavailable(_)
            | AppError::DecodeFailure(_) => LogLevel::Warn,
            AppError::EncodeFailure(_) | AppError::Internal(_) => LogLevel::Error,
        }
    }
}
