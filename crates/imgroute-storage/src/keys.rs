//! Key validation and option parsing shared by every backend.

use imgroute_core::Format;
use serde_json::{Map, Value};

use crate::traits::{StorageError, StorageResult};

/// Reject keys that could escape the backend root.
pub(crate) fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() {
        return Err(StorageError::InvalidKey("Storage key is empty".to_string()));
    }
    if key.starts_with('/') || key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey(
            "Storage key contains invalid characters".to_string(),
        ));
    }
    Ok(())
}

/// Suffix search list from the `suffixes` option, or every known image suffix.
pub(crate) fn suffixes_option(options: &Map<String, Value>) -> StorageResult<Vec<String>> {
    match options.get("suffixes") {
        None | Some(Value::Null) => Ok(Format::all_suffixes()
            .into_iter()
            .map(String::from)
            .collect()),
        Some(Value::Array(values)) => values
            .iter()
            .map(|value| match value.as_str() {
                Some(s) if s.starts_with('.') => Ok(s.to_string()),
                Some(s) => Ok(format!(".{s}")),
                None => Err(StorageError::ConfigError(
                    "suffixes must be a list of strings".to_string(),
                )),
            })
            .collect(),
        Some(_) => Err(StorageError::ConfigError(
            "suffixes must be a list of strings".to_string(),
        )),
    }
}

/// Optional string option.
pub(crate) fn string_option(options: &Map<String, Value>, name: &str) -> StorageResult<Option<String>> {
    match options.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(StorageError::ConfigError(format!("{name} must be a string"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_validate_key() {
        assert!(validate_key("photos/cat").is_ok());
        assert!(validate_key("cat..jpg").is_ok());
        assert!(matches!(validate_key("../etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key("a/../../b"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key("/etc/passwd"), Err(StorageError::InvalidKey(_))));
        assert!(matches!(validate_key(""), Err(StorageError::InvalidKey(_))));
    }

    #[test]
    fn test_suffixes_option() {
        let options = json!({"suffixes": [".png", "jpg"]});
        let suffixes = suffixes_option(options.as_object().unwrap()).unwrap();
        assert_eq!(suffixes, vec![".png", ".jpg"]);

        let defaults = suffixes_option(&Map::new()).unwrap();
        assert_eq!(defaults[0], ".jpg");

        let invalid = json!({"suffixes": ".png"});
        assert!(suffixes_option(invalid.as_object().unwrap()).is_err());
    }

    #[test]
    fn test_string_option() {
        let options = json!({"root": "/data", "port": 9000});
        let options = options.as_object().unwrap();
        assert_eq!(string_option(options, "root").unwrap().as_deref(), Some("/data"));
        assert_eq!(string_option(options, "missing").unwrap(), None);
        assert!(string_option(options, "port").is_err());
    }
}
