//! Error type shared by every content loader (config, level, replay).
//!
//! The simulation core never fails; only reading and validating files from
//! disk can. Each variant carries the offending path so log lines point
//! straight at the file to fix.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("validation failed for {path}: {reason}")]
    Invalid { path: PathBuf, reason: String },
}

impl LoadError {
    pub fn invalid(path: &Path, reason: impl Into<String>) -> Self {
        Self::Invalid {
            path: path.to_path_buf(),
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Read { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

/// Read and deserialize a JSON file. Validation is left to the caller.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, LoadError> {
    let raw = std::fs::read_to_string(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Sample {
        value: i32,
    }

    #[test]
    fn missing_file_reports_not_found() {
        let path = std::env::temp_dir().join("alien_core_error_test_does_not_exist.json");
        let err = read_json::<Sample>(&path).expect_err("missing file should fail");
        assert!(err.is_not_found());
        assert!(err.to_string().contains("failed to read"));
    }

    #[test]
    fn malformed_json_reports_parse_error() {
        let path = std::env::temp_dir().join(format!(
            "alien_core_error_test_parse_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, "{ \"value\": ").expect("write temp file");
        let err = read_json::<Sample>(&path).expect_err("truncated json should fail");
        assert!(matches!(err, LoadError::Parse { .. }));
        assert!(!err.is_not_found());
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn invalid_carries_reason_and_path() {
        let err = LoadError::invalid(Path::new("levels/x.json"), "platforms array is empty");
        let msg = err.to_string();
        assert!(msg.contains("levels/x.json"));
        assert!(msg.contains("platforms array is empty"));
    }

    #[test]
    fn valid_json_deserializes() {
        let path = std::env::temp_dir().join(format!(
            "alien_core_error_test_ok_{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{ "value": 7 }"#).expect("write temp file");
        let sample: Sample = read_json(&path).expect("valid json should load");
        assert_eq!(sample.value, 7);
        let _ = std::fs::remove_file(path);
    }
}
