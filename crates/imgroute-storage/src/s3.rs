use crate::keys::{string_option, suffixes_option, validate_key};
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::path::Path;
use object_store::Error as ObjectStoreError;
use object_store::{ObjectStoreExt, Result as ObjectResult};
use serde_json::{Map, Value};

const DEFAULT_REGION: &str = "us-east-1";

/// S3 storage implementation
#[derive(Clone)]
pub struct S3Storage {
    store: AmazonS3,
    bucket: String,
    /// Key prefix inside the bucket, without surrounding slashes
    root: String,
    suffixes: Vec<String>,
}

impl std::fmt::Debug for S3Storage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("S3Storage")
            .field("bucket", &self.bucket)
            .field("root", &self.root)
            .field("suffixes", &self.suffixes)
            .finish()
    }
}

impl S3Storage {
    /// Create a new S3Storage instance
    ///
    /// # Arguments
    /// * `bucket` - S3 bucket name
    /// * `region` - AWS region (or region identifier for S3-compatible providers)
    /// * `endpoint_url` - Optional custom endpoint URL for S3-compatible providers
    ///   (e.g., "http://localhost:9000" for MinIO)
    /// * `credentials` - Optional access key id and secret; otherwise taken from the environment
    pub fn new(
        bucket: String,
        region: String,
        endpoint_url: Option<String>,
        credentials: Option<(String, String)>,
        root: &str,
        suffixes: Vec<String>,
    ) -> StorageResult<Self> {
        let mut builder = AmazonS3Builder::from_env()
            .with_region(region)
            .with_bucket_name(bucket.clone());

        if let Some(endpoint) = endpoint_url {
            let allow_http = endpoint.starts_with("http://");
            builder = builder.with_endpoint(endpoint).with_allow_http(allow_http);
        }

        if let Some((access_key_id, secret_access_key)) = credentials {
            builder = builder
                .with_access_key_id(access_key_id)
                .with_secret_access_key(secret_access_key);
        }

        let store = builder
            .build()
            .map_err(|e| StorageError::ConfigError(e.to_string()))?;

        Ok(S3Storage {
            store,
            bucket,
            root: root.trim_matches('/').to_string(),
            suffixes,
        })
    }

    /// Build from storage options.
    ///
    /// `bucket` is required. `region`, `endpoint_url`, `aws_access_key_id`,
    /// `aws_secret_access_key`, `root` and `suffixes` are optional.
    pub fn from_options(options: &Map<String, Value>) -> StorageResult<Self> {
        let bucket = string_option(options, "bucket")?
            .ok_or_else(|| StorageError::ConfigError("s3 storage requires a bucket".to_string()))?;
        let region = match string_option(options, "region")? {
            Some(region) => region,
            None => string_option(options, "region_name")?
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
        };
        let endpoint_url = string_option(options, "endpoint_url")?;

        let credentials = match (
            string_option(options, "aws_access_key_id")?,
            string_option(options, "aws_secret_access_key")?,
        ) {
            (Some(id), Some(secret)) => Some((id, secret)),
            (None, None) => None,
            _ => {
                return Err(StorageError::ConfigError(
                    "aws_access_key_id and aws_secret_access_key must be set together".to_string(),
                ))
            }
        };

        let root = string_option(options, "root")?.unwrap_or_default();
        let suffixes = suffixes_option(options)?;

        Self::new(bucket, region, endpoint_url, credentials, &root, suffixes)
    }

    /// Object path for `key` with `suffix` under the configured root.
    fn object_path(&self, key: &str, suffix: &str) -> String {
        if self.root.is_empty() {
            format!("{}{}", key, suffix)
        } else {
            format!("{}/{}{}", self.root, key, suffix)
        }
    }
}

#[async_trait]
impl Storage for S3Storage {
    async fn read(&self, key: &str) -> StorageResult<Option<Bytes>> {
        validate_key(key)?;
        let start = std::time::Instant::now();

        for suffix in &self.suffixes {
            let object_path = self.object_path(key, suffix);
            let location = Path::from(object_path.as_str());

            let result: ObjectResult<_> = self.store.get(&location).await;
            let result = match result {
                Ok(result) => result,
                Err(ObjectStoreError::NotFound { .. }) => continue,
                Err(other) => {
                    tracing::error!(
                        error = %other,
                        bucket = %self.bucket,
                        key = %object_path,
                        duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                        "S3 download failed"
                    );
                    return Err(StorageError::DownloadFailed(other.to_string()));
                }
            };

            let bytes = result
                .bytes()
                .await
                .map_err(|e| StorageError::DownloadFailed(e.to_string()))?;

            tracing::debug!(
                bucket = %self.bucket,
                key = %object_path,
                size_bytes = bytes.len(),
                duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                "S3 download successful"
            );

            return Ok(Some(bytes));
        }

        tracing::debug!(bucket = %self.bucket, key = %key, "No S3 object matches storage key");
        Ok(None)
    }

    fn backend_type(&self) -> &'static str {
        "s3"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn options(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_bucket_required() {
        let result = S3Storage::from_options(&options(json!({"region": "eu-west-1"})));
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[test]
    fn test_partial_credentials_rejected() {
        let result = S3Storage::from_options(&options(json!({
            "bucket": "images",
            "aws_access_key_id": "AKIA",
        })));
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[test]
    fn test_object_path_with_root() {
        let storage = S3Storage::from_options(&options(json!({
            "bucket": "images",
            "endpoint_url": "http://localhost:9000",
            "aws_access_key_id": "minio",
            "aws_secret_access_key": "minio123",
            "root": "/originals/",
            "suffixes": [".png"],
        })))
        .unwrap();

        assert_eq!(storage.backend_type(), "s3");
        assert_eq!(storage.suffixes, vec![".png"]);
        assert_eq!(storage.object_path("photos/cat", ".png"), "originals/photos/cat.png");
    }

    #[test]
    fn test_object_path_without_root() {
        let storage = S3Storage::from_options(&options(json!({
            "bucket": "images",
            "endpoint_url": "http://localhost:9000",
            "aws_access_key_id": "minio",
            "aws_secret_access_key": "minio123",
        })))
        .unwrap();

        assert_eq!(storage.object_path("cat", ".jpg"), "cat.jpg");
    }

    #[tokio::test]
    async fn test_read_rejects_traversal_before_network() {
        let storage = S3Storage::from_options(&options(json!({
            "bucket": "images",
            "endpoint_url": "http://localhost:9000",
            "aws_access_key_id": "minio",
            "aws_secret_access_key": "minio123",
        })))
        .unwrap();

        let result = storage.read("../secret").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }
}
