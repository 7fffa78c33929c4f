use crate::keys::{string_option, suffixes_option, validate_key};
use crate::traits::{Storage, StorageError, StorageResult};
use async_trait::async_trait;
use bytes::Bytes;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Local filesystem storage implementation
#[derive(Clone, Debug)]
pub struct LocalStorage {
    /// Canonical form of the configured root
    root: PathBuf,
    suffixes: Vec<String>,
}

impl LocalStorage {
    /// Create a new LocalStorage instance
    ///
    /// # Arguments
    /// * `root` - Directory keys are resolved against (e.g., "/var/lib/images").
    ///   It must exist; it is canonicalized once here.
    /// * `suffixes` - Suffixes tried in order when resolving a key
    pub fn new(root: impl AsRef<Path>, suffixes: Vec<String>) -> StorageResult<Self> {
        let root = root.as_ref();
        let canonical = std::fs::canonicalize(root).map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to canonicalize root {}: {}",
                root.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            root: canonical,
            suffixes,
        })
    }

    /// Build from storage options: `root` (default `/`) and `suffixes`.
    pub fn from_options(options: &Map<String, Value>) -> StorageResult<Self> {
        let root = string_option(options, "root")?.unwrap_or_else(|| "/".to_string());
        let suffixes = suffixes_option(options)?;
        Self::new(root, suffixes)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// First existing file for `key`, trying each suffix in order.
    async fn find_file(&self, key: &str) -> StorageResult<Option<PathBuf>> {
        validate_key(key)?;
        let base = self.root.join(key);

        for suffix in &self.suffixes {
            let mut candidate = base.clone().into_os_string();
            candidate.push(suffix);
            let candidate = PathBuf::from(candidate);

            match fs::metadata(&candidate).await {
                Ok(meta) if meta.is_file() => {
                    self.ensure_inside_root(&candidate).await?;
                    return Ok(Some(candidate));
                }
                _ => continue,
            }
        }

        Ok(None)
    }

    /// Symlinks may still point outside the root even for a clean key.
    async fn ensure_inside_root(&self, path: &Path) -> StorageResult<()> {
        let canonical = fs::canonicalize(path).await?;

        if canonical.strip_prefix(&self.root).is_err() {
            return Err(StorageError::InvalidKey(
                "Storage key resolves outside storage directory".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn read(&self, key: &str) -> StorageResult<Option<Bytes>> {
        let start = std::time::Instant::now();

        let Some(path) = self.find_file(key).await? else {
            tracing::debug!(
                root = %self.root.display(),
                key = %key,
                "No file matches storage key"
            );
            return Ok(None);
        };

        let data = match fs::read(&path).await {
            Ok(data) => data,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(StorageError::DownloadFailed(format!(
                    "Failed to read file {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        tracing::debug!(
            path = %path.display(),
            key = %key,
            size_bytes = data.len(),
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage read successful"
        );

        Ok(Some(Bytes::from(data)))
    }

    fn backend_type(&self) -> &'static str {
        "file"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    fn suffixes(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn test_read_finds_first_matching_suffix() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("photos")).unwrap();
        std::fs::write(dir.path().join("photos/cat.png"), b"png bytes").unwrap();
        std::fs::write(dir.path().join("photos/cat.jpg"), b"jpg bytes").unwrap();

        let storage = LocalStorage::new(dir.path(), suffixes(&[".jpg", ".png"])).unwrap();
        let data = storage.read("photos/cat").await.unwrap().unwrap();
        assert_eq!(&data[..], b"jpg bytes");

        let storage = LocalStorage::new(dir.path(), suffixes(&[".png", ".jpg"])).unwrap();
        let data = storage.read("photos/cat").await.unwrap().unwrap();
        assert_eq!(&data[..], b"png bytes");
    }

    #[tokio::test]
    async fn test_read_missing_returns_none() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("dog.txt"), b"not an image").unwrap();

        let storage = LocalStorage::new(dir.path(), suffixes(&[".jpg", ".png"])).unwrap();
        assert!(storage.read("cat").await.unwrap().is_none());
        assert!(storage.read("dog").await.unwrap().is_none());
        assert!(storage.read("missing/folder/cat").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_directory_is_not_a_match() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("cat.jpg")).unwrap();

        let storage = LocalStorage::new(dir.path(), suffixes(&[".jpg"])).unwrap();
        assert!(storage.read("cat").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_path_traversal_rejected() {
        let dir = tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), suffixes(&[".jpg"])).unwrap();

        let result = storage.read("../../../etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));

        let result = storage.read("/etc/passwd").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_outside_root_rejected() {
        let outside = tempdir().unwrap();
        std::fs::write(outside.path().join("secret.jpg"), b"secret").unwrap();

        let dir = tempdir().unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.jpg"), dir.path().join("leak.jpg"))
            .unwrap();

        let storage = LocalStorage::new(dir.path(), suffixes(&[".jpg"])).unwrap();
        let result = storage.read("leak").await;
        assert!(matches!(result, Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_from_options() {
        let dir = tempdir().unwrap();
        let options = json!({"root": dir.path(), "suffixes": [".webp"]});
        let storage = LocalStorage::from_options(options.as_object().unwrap()).unwrap();
        assert_eq!(storage.root(), dir.path().canonicalize().unwrap());
        assert_eq!(storage.suffixes, vec![".webp"]);
        assert_eq!(storage.backend_type(), "file");

        let storage = LocalStorage::from_options(&Map::new()).unwrap();
        assert_eq!(storage.root(), Path::new("/"));
        assert!(storage.suffixes.contains(&".png".to_string()));
    }

    #[test]
    fn test_root_is_canonicalized_once() {
        let dir = tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("images")).unwrap();

        let storage = LocalStorage::new(dir.path().join("images/../images"), vec![]).unwrap();
        assert_eq!(storage.root(), dir.path().join("images").canonicalize().unwrap());

        let result = LocalStorage::new(dir.path().join("missing"), vec![]);
        assert!(matches!(result, Err(StorageError::ConfigError(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_root_behind_symlink_still_serves_files() {
        let real = tempdir().unwrap();
        std::fs::write(real.path().join("cat.jpg"), b"jpg bytes").unwrap();

        let link_parent = tempdir().unwrap();
        let link = link_parent.path().join("images");
        std::os::unix::fs::symlink(real.path(), &link).unwrap();

        let storage = LocalStorage::new(&link, suffixes(&[".jpg"])).unwrap();
        let data = storage.read("cat").await.unwrap().unwrap();
        assert_eq!(&data[..], b"jpg bytes");
    }
}
