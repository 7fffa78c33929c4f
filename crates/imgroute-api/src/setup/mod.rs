//! Application setup and initialization
//!
//! This module contains all application initialization logic extracted from main.rs
//! for better organization and testability.

pub mod routes;
pub mod server;
pub mod storage;

use crate::services::ImageResolver;
use crate::state::AppState;
use anyhow::{Context, Result};
use imgroute_core::{Config, LoaderRegistry, Settings};
use imgroute_processing::TransformRegistry;
use std::sync::Arc;

/// Initialize the entire application
pub async fn initialize_app(settings: &Settings) -> Result<(Arc<AppState>, axum::Router)> {
    // Initialize telemetry first
    crate::telemetry::init_telemetry(settings.log_format)
        .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let config = LoaderRegistry::with_builtins()
        .load(&settings.config_path)
        .with_context(|| format!("Failed to load {}", settings.config_path.display()))?;

    tracing::info!(environment = %settings.environment, "Settings loaded");

    let state = build_state(config, settings.cache_capacity)?;
    let router = routes::setup_routes(state.clone(), settings.max_concurrent_requests);

    Ok((state, router))
}

/// Transform registry with the built-ins and every compiled-in plugin.
pub fn transform_registry() -> TransformRegistry {
    #[allow(unused_mut)]
    let mut registry = TransformRegistry::with_builtins();

    #[cfg(feature = "plugins")]
    imgroute_plugins::register_plugins(&mut registry);

    registry
}

/// Validate `config` against the registered transforms, build the storages
/// and assemble the shared state.
pub fn build_state(config: Config, cache_capacity: usize) -> Result<Arc<AppState>> {
    let transforms = transform_registry();
    config
        .validate_transform_names(transforms.names())
        .context("Configuration validation failed")?;

    let storages = storage::setup_storage(&config, cache_capacity)?;

    tracing::info!(
        transforms = %transforms.names().join(","),
        "Transform registry ready"
    );

    let resolver = ImageResolver::new(Arc::new(config), storages, Arc::new(transforms));
    Ok(Arc::new(AppState::new(resolver)))
}
