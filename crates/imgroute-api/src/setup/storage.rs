//! Storage initialization

use crate::services::CachedStorage;
use anyhow::{Context, Result};
use imgroute_core::Config;
use imgroute_storage::{Storage, StorageFactory, StorageSet};
use std::num::NonZeroUsize;
use std::sync::Arc;

/// Build every configured storage, wrapped in a read cache when
/// `cache_capacity` is non-zero.
pub fn setup_storage(config: &Config, cache_capacity: usize) -> Result<StorageSet> {
    let factory = StorageFactory::with_builtins();
    let storages =
        StorageSet::from_config(config, &factory).context("Failed to initialize storage")?;

    let Some(capacity) = NonZeroUsize::new(cache_capacity) else {
        return Ok(storages);
    };

    tracing::info!(capacity = capacity.get(), "Storage read cache enabled");
    Ok(storages.map_storages(|_, storage| {
        Arc::new(CachedStorage::new(storage, capacity)) as Arc<dyn Storage>
    }))
}
