//! In-process read cache in front of a storage backend.

use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use bytes::Bytes;
use imgroute_storage::{Storage, StorageResult};
use lru::LruCache;

/// Storage decorator keeping the most recently read objects in memory.
///
/// Only hits are cached, so an object added to the backend after a miss is
/// picked up by the next request.
pub struct CachedStorage {
    inner: Arc<dyn Storage>,
    cache: Mutex<LruCache<String, Bytes>>,
}

impl CachedStorage {
    pub fn new(inner: Arc<dyn Storage>, capacity: NonZeroUsize) -> Self {
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
        }
    }

    fn cache(&self) -> MutexGuard<'_, LruCache<String, Bytes>> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.cache().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache().is_empty()
    }
}

#[async_trait]
impl Storage for CachedStorage {
    async fn read(&self, key: &str) -> StorageResult<Option<Bytes>> {
        let cached = self.cache().get(key).cloned();
        if let Some(data) = cached {
            tracing::debug!(key = %key, size_bytes = data.len(), "Read cache hit");
            return Ok(Some(data));
        }

        let data = self.inner.read(key).await?;
        if let Some(ref data) = data {
            self.cache().put(key.to_string(), data.clone());
        }
        Ok(data)
    }

    fn backend_type(&self) -> &'static str {
        self.inner.backend_type()
    }
}
