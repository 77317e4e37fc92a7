//! JSON document loading for config files and valuation input documents.
//!
//! Paths may use `~` and environment variables (`$HOME/inputs/acme.json`);
//! they are expanded before the file is opened.

use serde::de::DeserializeOwned;
use std::fs;
use std::path::PathBuf;

use crate::error::{Error, Result, ResultExt};

/// Expand `~` and environment variables in a user-supplied path.
pub fn expand_path(raw: &str) -> Result<PathBuf> {
    let expanded = shellexpand::full(raw)
        .map_err(|e| Error::InvalidInput(format!("cannot expand path {raw}: {e}")))?;
    Ok(PathBuf::from(expanded.as_ref()))
}

/// Load a JSON file and deserialize it into `T`.
pub fn load_json_file<T: DeserializeOwned>(raw_path: &str) -> Result<T> {
    let path = expand_path(raw_path)?;
    if !path.exists() {
        return Err(Error::NotFound(path.display().to_string()));
    }

    let content =
        fs::read_to_string(&path).context(format!("Failed to read {}", path.display()))?;

    let value = serde_json::from_str(&content).context(format!("Failed to parse {}", path.display()))?;

    tracing::debug!(path = %path.display(), bytes = content.len(), "Loaded JSON document");
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize)]
    struct Sample {
        name: String,
        value: f64,
    }

    #[test]
    fn test_load_json_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "name": "acme", "value": 1.5 }}"#).unwrap();

        let sample: Sample = load_json_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(sample.name, "acme");
        assert!((sample.value - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = load_json_file::<Sample>("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn test_malformed_file_has_context() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"name\": ").unwrap();

        let err = load_json_file::<Sample>(file.path().to_str().unwrap()).unwrap_err();
        assert!(matches!(err, Error::WithContext { .. }));
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_expand_plain_path() {
        let path = expand_path("/tmp/input.json").unwrap();
        assert_eq!(path, PathBuf::from("/tmp/input.json"));
    }
}
