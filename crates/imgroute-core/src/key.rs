//! Request path decomposition.
//!
//! A request path has the shape `/<transform>/<segment>+.<suffix>`. The first
//! segment selects the transform chain, the remaining segments form the
//! backend-agnostic storage key, and the suffix selects the output format.

use std::str::FromStr;

use crate::constants::{ROOT_FOLDER, SEPARATOR};
use crate::format::Format;

/// Structural failures while decomposing a request path.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KeyError {
    #[error("path is empty")]
    Empty,

    #[error("path cannot end with a separator")]
    TrailingSeparator,

    #[error("unknown format suffix: {0:?}")]
    UnknownFormat(String),

    #[error("path needs a transform and at least one key segment")]
    TooFewSegments,
}

/// Structured decomposition of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemKey {
    /// Original request path.
    pub path: String,
    /// Transform chain name or inline transform chain.
    pub transform: String,
    /// Storage key without suffix, segments joined by `/`.
    pub key: String,
    /// `key` with a leading separator.
    pub key_path: String,
    /// Suffix including the leading dot, as written in the path.
    pub suffix: String,
    pub format: Format,
    /// Last key segment.
    pub name: String,
    /// Parent folder of the key, `/` for top-level keys.
    pub folder: String,
    /// Route lookup candidates, most specific first, root last.
    pub folders: Vec<String>,
}

impl ItemKey {
    pub fn parse(path: &str) -> Result<Self, KeyError> {
        if path.is_empty() {
            return Err(KeyError::Empty);
        }
        if path.ends_with(SEPARATOR) {
            return Err(KeyError::TrailingSeparator);
        }

        let (stem, suffix) = split_suffix(path);
        let format =
            Format::from_suffix(suffix).ok_or_else(|| KeyError::UnknownFormat(suffix.to_string()))?;

        let mut parts: Vec<&str> = stem.split(SEPARATOR).filter(|s| !s.is_empty()).collect();
        if parts.len() < 2 {
            return Err(KeyError::TooFewSegments);
        }

        let transform = parts.remove(0).to_string();
        let key = parts.join("/");
        let key_path = format!("{SEPARATOR}{key}");

        // parts is non-empty: at least one key segment survived the check above
        let name = parts.pop().unwrap_or_default().to_string();
        let folder = prefixed(&parts);

        let mut folders = Vec::with_capacity(parts.len() + 2);
        folders.push(key_path.clone());
        for len in (0..=parts.len()).rev() {
            folders.push(prefixed(&parts[..len]));
        }

        Ok(Self {
            path: path.to_string(),
            transform,
            key,
            key_path,
            suffix: suffix.to_string(),
            format,
            name,
            folder,
            folders,
        })
    }
}

impl FromStr for ItemKey {
    type Err = KeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Split `path` into stem and suffix. Leading dots of the last segment never
/// start a suffix, so `/a/.hidden` has no suffix.
fn split_suffix(path: &str) -> (&str, &str) {
    let base_start = path.rfind(SEPARATOR).map_or(0, |i| i + 1);
    let base = &path[base_start..];
    let dots = base.len() - base.trim_start_matches('.').len();

    match base[dots..].rfind('.') {
        Some(pos) => path.split_at(base_start + dots + pos),
        None => (path, ""),
    }
}

fn prefixed(parts: &[&str]) -> String {
    if parts.is_empty() {
        return ROOT_FOLDER.to_string();
    }
    format!("{SEPARATOR}{}", parts.join("/"))
}
