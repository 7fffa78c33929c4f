//! Routing configuration model
//!
//! The configuration binds folder prefixes to routes (storage backend,
//! transform policy, encoder options), names storage backends, and names
//! reusable transform chains. It is loaded once at startup and only read
//! afterwards.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};

use crate::constants::{OPTION_SEPARATOR, STEP_SEPARATOR};
use crate::key::ItemKey;

/// Encoder options for one output format, passed through to the codec.
pub type SaveOptions = Map<String, Value>;

/// Configuration errors, both at load time and during request resolution.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config Error: cannot find route for {0}")]
    NotFound(String),

    #[error("Config Error: route references unknown storage {0:?}")]
    UnknownStorage(String),

    #[error("Config Error: {0} cannot be used as a transform name")]
    ReservedTransformName(String),

    #[error("Config Error: {0:?} is an unknown format")]
    UnknownLoader(String),

    #[error("Config Error: failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config Error: failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// One step of a transform chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransformStep {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, deserialize_with = "deserialize_options")]
    pub options: Vec<String>,
}

impl TransformStep {
    pub fn new(kind: impl Into<String>, options: Vec<String>) -> Self {
        Self {
            kind: kind.into(),
            options,
        }
    }

    /// Parse a single inline step: `type_opt1_opt2`.
    pub fn from_query(query: &str) -> Self {
        let mut parts = query.split(OPTION_SEPARATOR).map(|part| part.trim().to_string());
        let kind = parts.next().unwrap_or_default();
        Self {
            kind,
            options: parts.collect(),
        }
    }

    /// Parse an inline chain: `type_opt1,type2_opt1`.
    pub fn from_queries(queries: &str) -> Vec<Self> {
        queries
            .split(STEP_SEPARATOR)
            .map(|query| Self::from_query(query.trim()))
            .collect()
    }
}

/// Accepts option lists written as strings or numbers.
fn deserialize_options<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Vec::<Value>::deserialize(deserializer)?;
    values
        .into_iter()
        .map(|value| match value {
            Value::String(s) => Ok(s),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            other => Err(serde::de::Error::custom(format!(
                "transform option must be a string or number, got {}",
                other
            ))),
        })
        .collect()
}

/// Which transforms a route permits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawTransformPolicy")]
pub enum TransformPolicy {
    #[default]
    Disabled,
    AnyAllowed,
    AllowList(Vec<String>),
}

impl TransformPolicy {
    fn allows(&self, name: &str) -> bool {
        match self {
            Self::Disabled => false,
            Self::AnyAllowed => true,
            Self::AllowList(names) => names.iter().any(|n| n == name),
        }
    }
}

/// Shapes accepted for `route.transform` in configuration files.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawTransformPolicy {
    Flag(bool),
    Single(String),
    List(Vec<String>),
}

impl From<RawTransformPolicy> for TransformPolicy {
    fn from(raw: RawTransformPolicy) -> Self {
        match raw {
            RawTransformPolicy::Flag(true) => Self::AnyAllowed,
            RawTransformPolicy::Flag(false) => Self::Disabled,
            RawTransformPolicy::Single(name) if name.is_empty() => Self::Disabled,
            RawTransformPolicy::Single(name) => Self::AllowList(vec![name]),
            RawTransformPolicy::List(names) if names.is_empty() => Self::Disabled,
            RawTransformPolicy::List(names) => Self::AllowList(names),
        }
    }
}

/// Configuration scope bound to a folder prefix.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RouteConfig {
    pub storage: String,
    #[serde(default)]
    pub transform: TransformPolicy,
    /// Response lifetime in seconds.
    #[serde(default)]
    pub expire: Option<u64>,
    /// Encoder options keyed by canonical format name (`JPEG`, `PNG`, ...).
    #[serde(default)]
    pub save: HashMap<String, SaveOptions>,
}

impl RouteConfig {
    pub fn save_options(&self, format_name: &str) -> Option<&SaveOptions> {
        self.save.get(format_name)
    }
}

/// Storage backend declaration. Only `kind` is interpreted here; `options`
/// are handed to the backend constructor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawStorageConfig")]
pub struct StorageConfig {
    pub kind: String,
    pub options: Map<String, Value>,
}

impl StorageConfig {
    pub fn new(kind: impl Into<String>, options: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            options,
        }
    }
}

#[derive(Deserialize)]
struct RawStorageConfig {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    options: Map<String, Value>,
    #[serde(flatten)]
    inline: Map<String, Value>,
}

impl From<RawStorageConfig> for StorageConfig {
    fn from(raw: RawStorageConfig) -> Self {
        let mut options = raw.options;
        options.extend(raw.inline);
        Self {
            kind: raw.kind,
            options,
        }
    }
}

/// Root configuration.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: HashMap<String, StorageConfig>,
    #[serde(default)]
    pub transform: HashMap<String, Vec<TransformStep>>,
    #[serde(default)]
    pub route: HashMap<String, RouteConfig>,
}

impl Config {
    /// Nearest configured route for `key`, most specific folder first.
    pub fn route_of(&self, key: &ItemKey) -> Result<&RouteConfig, ConfigError> {
        key.folders
            .iter()
            .find_map(|folder| self.route.get(folder))
            .ok_or_else(|| ConfigError::NotFound(key.path.clone()))
    }

    pub fn storage_of(&self, key: &ItemKey) -> Result<&StorageConfig, ConfigError> {
        let route = self.route_of(key)?;
        self.storage
            .get(&route.storage)
            .ok_or_else(|| ConfigError::UnknownStorage(route.storage.clone()))
    }

    /// Steps to run for `key`: a named chain verbatim, otherwise the steps
    /// parsed inline. Unknown step types are only detected when the chain runs.
    pub fn transforms_of(&self, key: &ItemKey) -> Vec<TransformStep> {
        match self.transform.get(&key.transform) {
            Some(chain) => chain.clone(),
            None => TransformStep::from_queries(&key.transform),
        }
    }

    /// Whether the route governing `key` permits its transform. Named chains
    /// are checked by chain name; inline chains require every step type to be
    /// allowed.
    pub fn allow_transform(&self, key: &ItemKey) -> Result<bool, ConfigError> {
        let policy = &self.route_of(key)?.transform;
        let allowed = match policy {
            TransformPolicy::Disabled => false,
            TransformPolicy::AnyAllowed => true,
            TransformPolicy::AllowList(_) if self.transform.contains_key(&key.transform) => {
                policy.allows(&key.transform)
            }
            TransformPolicy::AllowList(_) => TransformStep::from_queries(&key.transform)
                .iter()
                .all(|step| policy.allows(&step.kind)),
        };
        Ok(allowed)
    }

    /// Startup check: chain names must not shadow registered operations.
    pub fn validate_transform_names<'a, I>(&self, reserved: I) -> Result<(), ConfigError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for name in reserved {
            if self.transform.contains_key(name) {
                return Err(ConfigError::ReservedTransformName(name.to_string()));
            }
        }

        for (folder, route) in &self.route {
            if !self.storage.contains_key(&route.storage) {
                tracing::warn!(
                    folder = %folder,
                    storage = %route.storage,
                    "Route references a storage that is not configured"
                );
            }
        }

        Ok(())
    }
}
