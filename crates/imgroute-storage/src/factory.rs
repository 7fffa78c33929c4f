#[cfg(feature = "storage-local")]
use crate::LocalStorage;
#[cfg(feature = "storage-s3")]
use crate::S3Storage;
use crate::{Storage, StorageError, StorageResult};
use imgroute_core::{Config, StorageConfig};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;

/// Builds a backend from the options of a storage entry.
pub type StorageConstructor = fn(&Map<String, Value>) -> StorageResult<Arc<dyn Storage>>;

/// Storage type name to constructor. The first registration of a name wins.
#[derive(Clone, Default)]
pub struct StorageFactory {
    constructors: HashMap<String, StorageConstructor>,
}

impl StorageFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Factory with the backends compiled into this crate (`file`, `s3`).
    pub fn with_builtins() -> Self {
        let mut factory = Self::new();

        #[cfg(feature = "storage-local")]
        factory.register("file", |options| {
            Ok(Arc::new(LocalStorage::from_options(options)?) as Arc<dyn Storage>)
        });

        #[cfg(feature = "storage-s3")]
        factory.register("s3", |options| {
            Ok(Arc::new(S3Storage::from_options(options)?) as Arc<dyn Storage>)
        });

        factory
    }

    /// Register a constructor. Returns false if the name was already taken.
    pub fn register(&mut self, kind: &str, constructor: StorageConstructor) -> bool {
        if self.constructors.contains_key(kind) {
            tracing::debug!(storage_type = %kind, "Storage type already registered, keeping first");
            return false;
        }
        self.constructors.insert(kind.to_string(), constructor);
        true
    }

    pub fn supports(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }

    pub fn create(&self, config: &StorageConfig) -> StorageResult<Arc<dyn Storage>> {
        let constructor = self
            .constructors
            .get(&config.kind)
            .ok_or_else(|| StorageError::UnknownBackend(config.kind.clone()))?;
        constructor(&config.options)
    }
}

/// Named storage instances, one per entry of the `storage` table.
#[derive(Clone, Default)]
pub struct StorageSet {
    storages: HashMap<String, Arc<dyn Storage>>,
}

impl StorageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build every storage declared in `config`. Any failure aborts the whole set.
    pub fn from_config(config: &Config, factory: &StorageFactory) -> StorageResult<Self> {
        let mut set = Self::new();
        for (name, storage_config) in &config.storage {
            let storage = factory.create(storage_config).map_err(|e| {
                tracing::error!(
                    storage = %name,
                    storage_type = %storage_config.kind,
                    error = %e,
                    "Failed to create storage"
                );
                e
            })?;
            tracing::info!(
                storage = %name,
                storage_type = %storage.backend_type(),
                "Storage initialized"
            );
            set.insert(name, storage);
        }
        Ok(set)
    }

    pub fn insert(&mut self, name: &str, storage: Arc<dyn Storage>) {
        self.storages.insert(name.to_string(), storage);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Storage>> {
        self.storages.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.storages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storages.is_empty()
    }

    /// Replace every storage with `wrap(name, storage)`.
    pub fn map_storages<F>(self, wrap: F) -> Self
    where
        F: Fn(&str, Arc<dyn Storage>) -> Arc<dyn Storage>,
    {
        let storages = self
            .storages
            .into_iter()
            .map(|(name, storage)| {
                let wrapped = wrap(&name, storage);
                (name, wrapped)
            })
            .collect();
        Self { storages }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use bytes::Bytes;
    use serde_json::json;

    struct FixedStorage(&'static [u8]);

    #[async_trait]
    impl Storage for FixedStorage {
        async fn read(&self, _key: &str) -> StorageResult<Option<Bytes>> {
            Ok(Some(Bytes::from_static(self.0)))
        }

        fn backend_type(&self) -> &'static str {
            "fixed"
        }
    }

    fn storage_config(kind: &str, options: Value) -> StorageConfig {
        StorageConfig::new(kind, options.as_object().cloned().unwrap_or_default())
    }

    #[test]
    fn test_unknown_backend() {
        let result = StorageFactory::with_builtins().create(&storage_config("ftp", json!({})));
        assert!(matches!(result, Err(StorageError::UnknownBackend(kind)) if kind == "ftp"));
    }

    #[cfg(feature = "storage-local")]
    #[test]
    fn test_create_file_storage() {
        let dir = tempfile::tempdir().unwrap();
        let storage = StorageFactory::with_builtins()
            .create(&storage_config("file", json!({"root": dir.path()})))
            .unwrap();
        assert_eq!(storage.backend_type(), "file");
    }

    #[cfg(feature = "storage-local")]
    #[tokio::test]
    async fn test_first_registration_wins() {
        let mut factory = StorageFactory::with_builtins();
        let replaced = factory.register("file", |_| Ok(Arc::new(FixedStorage(b"x")) as Arc<dyn Storage>));
        assert!(!replaced);
        assert!(factory.register("fixed", |_| {
            Ok(Arc::new(FixedStorage(b"fixed")) as Arc<dyn Storage>)
        }));

        let storage = factory.create(&storage_config("file", json!({}))).unwrap();
        assert_eq!(storage.backend_type(), "file");

        let storage = factory.create(&storage_config("fixed", json!({}))).unwrap();
        assert_eq!(&storage.read("any").await.unwrap().unwrap()[..], b"fixed");
    }

    #[test]
    fn test_storage_set_from_config() {
        let mut factory = StorageFactory::new();
        factory.register("fixed", |_| Ok(Arc::new(FixedStorage(b"a")) as Arc<dyn Storage>));

        let mut config = Config::default();
        config
            .storage
            .insert("primary".to_string(), storage_config("fixed", json!({})));
        config
            .storage
            .insert("backup".to_string(), storage_config("fixed", json!({})));

        let set = StorageSet::from_config(&config, &factory).unwrap();
        assert_eq!(set.len(), 2);
        assert!(set.get("primary").is_some());
        assert!(set.get("missing").is_none());

        config
            .storage
            .insert("broken".to_string(), storage_config("nope", json!({})));
        assert!(StorageSet::from_config(&config, &factory).is_err());
    }

    #[tokio::test]
    async fn test_map_storages() {
        let mut set = StorageSet::new();
        set.insert("a", Arc::new(FixedStorage(b"original")));

        let set = set.map_storages(|_, _| Arc::new(FixedStorage(b"wrapped")));
        let storage = set.get("a").unwrap();
        assert_eq!(&storage.read("k").await.unwrap().unwrap()[..], b"wrapped");
    }
}
