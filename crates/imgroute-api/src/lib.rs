//! imgroute API Library
//!
//! This crate provides the HTTP boundary, the request resolver and
//! application setup.

mod handlers;
pub mod services;
pub mod setup;
pub mod telemetry;

// Public modules
pub mod error;
pub mod state;

// Re-exports
pub use error::HttpAppError;
pub use services::{CachedStorage, ImageResolver, RenderedImage};
pub use state::AppState;
