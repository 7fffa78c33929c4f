//! Configuration file loaders
//!
//! Loaders are selected by file suffix through an explicit registry. The
//! first loader registered for a suffix owns it; JSON and YAML are built in
//! and both produce the same `Config`.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::{Config, ConfigError};

/// Parses configuration text into a `Config`.
pub trait ConfigLoader: Send + Sync {
    /// Suffixes (with leading dot) this loader handles.
    fn suffixes(&self) -> &[&'static str];

    fn parse(&self, contents: &str, path: &Path) -> Result<Config, ConfigError>;
}

pub struct JsonConfigLoader;

impl ConfigLoader for JsonConfigLoader {
    fn suffixes(&self) -> &[&'static str] {
        &[".json"]
    }

    fn parse(&self, contents: &str, path: &Path) -> Result<Config, ConfigError> {
        serde_json::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

pub struct YamlConfigLoader;

impl ConfigLoader for YamlConfigLoader {
    fn suffixes(&self) -> &[&'static str] {
        &[".yml", ".yaml"]
    }

    fn parse(&self, contents: &str, path: &Path) -> Result<Config, ConfigError> {
        serde_yaml::from_str(contents).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

/// Suffix → loader registry.
#[derive(Clone, Default)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn ConfigLoader>>,
}

impl LoaderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the JSON and YAML loaders.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(JsonConfigLoader));
        registry.register(Arc::new(YamlConfigLoader));
        registry
    }

    /// Register `loader` for each of its suffixes not already taken.
    pub fn register(&mut self, loader: Arc<dyn ConfigLoader>) {
        for suffix in loader.suffixes() {
            if self.loaders.contains_key(*suffix) {
                tracing::debug!(suffix = %suffix, "Config loader suffix already registered, skipping");
                continue;
            }
            self.loaders.insert(suffix.to_string(), loader.clone());
        }
    }

    pub fn supports(&self, suffix: &str) -> bool {
        self.loaders.contains_key(suffix)
    }

    pub fn load(&self, path: impl AsRef<Path>) -> Result<Config, ConfigError> {
        let path = path.as_ref();
        let suffix = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| format!(".{ext}"))
            .unwrap_or_default();

        let loader = self
            .loaders
            .get(&suffix)
            .ok_or_else(|| ConfigError::UnknownLoader(suffix.clone()))?;

        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let config = loader.parse(&contents, path)?;
        tracing::info!(
            path = %path.display(),
            storages = config.storage.len(),
            transforms = config.transform.len(),
            routes = config.route.len(),
            "Routing configuration loaded"
        );
        Ok(config)
    }
}
