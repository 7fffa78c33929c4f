//! imgroute Storage Library
//!
//! This crate provides the read-only storage abstraction used to fetch source
//! images, with implementations for the local filesystem and S3-compatible
//! object stores.
//!
//! # Storage key format
//!
//! Keys are backend-agnostic and carry no suffix (`photos/cat`). Each backend
//! resolves a key by trying its allowed suffixes in order (`photos/cat.jpg`,
//! `photos/cat.jpeg`, ...) and returning the first object that exists.
//! Keys must not contain `..` or a leading `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-local")]
pub mod local;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::{StorageConstructor, StorageFactory, StorageSet};
#[cfg(feature = "storage-local")]
pub use local::LocalStorage;
#[cfg(feature = "storage-s3")]
pub use s3::S3Storage;
pub use traits::{Storage, StorageError, StorageResult};
