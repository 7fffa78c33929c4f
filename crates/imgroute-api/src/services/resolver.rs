//! Request path to rendered image.

use std::sync::Arc;

use bytes::Bytes;
use imgroute_core::{AppError, Config, ItemKey};
use imgroute_processing::{decode, encode, EncodedImage, TransformRegistry};
use imgroute_storage::StorageSet;

/// Encoded response body with the metadata the HTTP layer needs.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub bytes: Bytes,
    pub content_type: &'static str,
    /// Route `expire`, in seconds
    pub expire: Option<u64>,
}

/// Resolves request paths against the routing config, storages and transforms.
#[derive(Clone)]
pub struct ImageResolver {
    config: Arc<Config>,
    storages: StorageSet,
    transforms: Arc<TransformRegistry>,
}

impl ImageResolver {
    pub fn new(config: Arc<Config>, storages: StorageSet, transforms: Arc<TransformRegistry>) -> Self {
        Self {
            config,
            storages,
            transforms,
        }
    }

    pub async fn resolve(&self, path: &str) -> Result<RenderedImage, AppError> {
        let key = ItemKey::parse(path)?;

        if !self.config.allow_transform(&key)? {
            return Err(AppError::ForbiddenTransform(format!(
                "{} is not allowed for {}",
                key.transform, key.key_path
            )));
        }

        let route = self.config.route_of(&key)?;
        // Typed UnknownStorage for a dangling route; the set holds one
        // backend per configured storage name.
        let storage_config = self.config.storage_of(&key)?;
        let storage = self.storages.get(&route.storage).ok_or_else(|| {
            AppError::Internal(format!("storage {} was not initialized", route.storage))
        })?;

        let data = storage
            .read(&key.key)
            .await?
            .ok_or_else(|| AppError::NotFound(key.key_path.clone()))?;

        let steps = self.config.transforms_of(&key);
        let save_options = route
            .save_options(key.format.name())
            .cloned()
            .unwrap_or_default();
        let transforms = self.transforms.clone();
        let format = key.format;
        let source_size = data.len();

        let start = std::time::Instant::now();
        let encoded = tokio::task::spawn_blocking(move || -> Result<EncodedImage, AppError> {
            let image = decode(&data)?;
            let image = transforms.run(image, &steps)?;
            encode(&image, format, &save_options).map_err(AppError::from)
        })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to spawn blocking task");
            AppError::Internal(e.to_string())
        })??;

        tracing::debug!(
            path = %key.path,
            storage = %route.storage,
            storage_type = %storage_config.kind,
            transform = %key.transform,
            format = %format,
            source_bytes = source_size,
            output_bytes = encoded.bytes.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Image rendered"
        );

        Ok(RenderedImage {
            content_type: encoded.content_type(),
            bytes: encoded.bytes,
            expire: route.expire,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use image::{DynamicImage, GenericImageView, Rgb, RgbImage};
    use imgroute_core::ErrorMetadata;
    use imgroute_storage::{Storage, StorageError, StorageResult};
    use std::collections::HashMap;

    struct MemoryStorage {
        objects: HashMap<String, Bytes>,
    }

    #[async_trait]
    impl Storage for MemoryStorage {
        async fn read(&self, key: &str) -> StorageResult<Option<Bytes>> {
            if key.contains("broken") {
                return Err(StorageError::BackendError("connection reset".to_string()));
            }
            Ok(self.objects.get(key).cloned())
        }

        fn backend_type(&self) -> &'static str {
            "memory"
        }
    }

    fn png(width: u32, height: u32) -> Bytes {
        let image = DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            Rgb([x as u8, y as u8, 0])
        }));
        let encoded = encode(&image, imgroute_core::Format::Png, &Default::default()).unwrap();
        encoded.bytes
    }

    fn resolver(config: serde_json::Value) -> ImageResolver {
        let config: Config = serde_json::from_value(config).unwrap();

        let mut objects = HashMap::new();
        objects.insert("photos/cat".to_string(), png(40, 20));
        objects.insert("photos/garbage".to_string(), Bytes::from_static(b"not an image"));

        let mut storages = StorageSet::new();
        storages.insert("mem", Arc::new(MemoryStorage { objects }));

        ImageResolver::new(
            Arc::new(config),
            storages,
            Arc::new(TransformRegistry::with_builtins()),
        )
    }

    fn default_resolver() -> ImageResolver {
        resolver(serde_json::json!({
            "storage": {"mem": {"type": "memory"}},
            "transform": {"small": [{"type": "t", "options": [10, 10]}]},
            "route": {
                "/": {"storage": "mem", "transform": true, "expire": 60},
                "/private": {"storage": "mem", "transform": false},
                "/limited": {"storage": "mem", "transform": ["small"]},
                "/dangling": {"storage": "nowhere", "transform": true}
            }
        }))
    }

    async fn status(resolver: &ImageResolver, path: &str) -> u16 {
        resolver.resolve(path).await.unwrap_err().http_status_code()
    }

    #[tokio::test]
    async fn test_resolve_transforms_and_encodes() {
        let resolver = default_resolver();
        let rendered = resolver.resolve("/r_8_8/photos/cat.jpg").await.unwrap();
        assert_eq!(rendered.content_type, "image/jpeg");
        assert_eq!(rendered.expire, Some(60));

        let image = decode(&rendered.bytes).unwrap();
        assert_eq!(image.dimensions(), (8, 8));
    }

    #[tokio::test]
    async fn test_named_chain() {
        let resolver = default_resolver();
        let rendered = resolver.resolve("/small/photos/cat.png").await.unwrap();
        let image = decode(&rendered.bytes).unwrap();
        assert_eq!(image.dimensions(), (10, 5));
    }

    #[tokio::test]
    async fn test_not_found_class() {
        let resolver = default_resolver();
        // malformed
        assert_eq!(status(&resolver, "/photos.jpg").await, 404);
        assert_eq!(status(&resolver, "/origin/photos/cat.jpg2").await, 404);
        // missing object
        assert_eq!(status(&resolver, "/origin/photos/dog.png").await, 404);
        // backend failure
        assert_eq!(status(&resolver, "/origin/photos/broken.png").await, 404);
        // undecodable object
        assert_eq!(status(&resolver, "/origin/photos/garbage.png").await, 404);
        // route points at a storage that does not exist
        assert_eq!(status(&resolver, "/origin/dangling/cat.png").await, 404);
    }

    #[tokio::test]
    async fn test_dangling_route_is_typed_config_error() {
        let resolver = default_resolver();
        let err = resolver.resolve("/origin/dangling/cat.png").await.unwrap_err();
        assert!(matches!(err, AppError::ConfigNotFound(ref reason) if reason.contains("nowhere")));
    }

    #[tokio::test]
    async fn test_forbidden_transform() {
        let resolver = default_resolver();
        let err = resolver.resolve("/origin/private/cat.png").await.unwrap_err();
        assert!(matches!(err, AppError::ForbiddenTransform(_)));

        let err = resolver.resolve("/r_5_5/limited/cat.png").await.unwrap_err();
        assert!(matches!(err, AppError::ForbiddenTransform(_)));
    }

    #[tokio::test]
    async fn test_no_route() {
        let resolver = resolver(serde_json::json!({
            "storage": {"mem": {"type": "memory"}},
            "route": {"/photos": {"storage": "mem", "transform": true}}
        }));
        let err = resolver.resolve("/origin/other/cat.png").await.unwrap_err();
        assert!(matches!(err, AppError::ConfigNotFound(_)));

        assert!(resolver.resolve("/origin/photos/cat.png").await.is_ok());
    }

    #[tokio::test]
    async fn test_transform_client_errors() {
        let resolver = default_resolver();
        let err = resolver.resolve("/sepia_1/photos/cat.png").await.unwrap_err();
        assert!(matches!(err, AppError::UnknownTransform(_)));
        assert_eq!(err.http_status_code(), 400);

        let err = resolver.resolve("/r_0_5/photos/cat.png").await.unwrap_err();
        assert!(matches!(err, AppError::InvalidOptions(_)));
        assert_eq!(err.http_status_code(), 400);
    }

    #[tokio::test]
    async fn test_save_options_by_format_name() {
        let resolver = resolver(serde_json::json!({
            "storage": {"mem": {"type": "memory"}},
            "route": {"/": {
                "storage": "mem",
                "transform": true,
                "save": {"JPEG": {"quality": 0}}
            }}
        }));

        let err = resolver.resolve("/origin/photos/cat.jpg").await.unwrap_err();
        assert!(matches!(err, AppError::EncodeFailure(_)));
        assert_eq!(err.http_status_code(), 500);

        assert!(resolver.resolve("/origin/photos/cat.png").await.is_ok());
    }
}
