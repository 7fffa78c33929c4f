//! imgroute Core Library
//!
//! This crate provides the addressing and configuration model shared by every
//! imgroute component: request path decomposition (`ItemKey`), the routing
//! configuration (`Config`) with its lookup and authorization queries, the
//! configuration file loaders, process settings and the request error taxonomy.

pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod key;
pub mod loader;
pub mod settings;

// Re-export commonly used types
pub use config::{
    Config, ConfigError, RouteConfig, SaveOptions, StorageConfig, TransformPolicy, TransformStep,
};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use format::Format;
pub use key::{ItemKey, KeyError};
pub use loader::{ConfigLoader, JsonConfigLoader, LoaderRegistry, YamlConfigLoader};
pub use settings::{LogFormat, Settings};
