//! Startup configuration loaded from a config directory.
//!
//! ```text
//! <config-dir>/
//!   features.json     required, ordered symptom ids
//!   synonyms.json     optional, id → [phrase]
//!   departments.json  optional, condition label → department
//!   model.json        classifier weights
//!   labels.json       label encoder classes
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{info, warn};

use crate::extractor::ExtractorError;
use crate::models::{FeatureSchema, SchemaError};
use crate::predictor::DepartmentMap;

pub const FEATURES_FILE: &str = "features.json";
pub const SYNONYMS_FILE: &str = "synonyms.json";
pub const DEPARTMENTS_FILE: &str = "departments.json";
pub const MODEL_FILE: &str = "model.json";
pub const LABELS_FILE: &str = "labels.json";

/// Configuration errors. All are fatal at startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid feature schema: {0}")]
    Schema(#[from] SchemaError),

    #[error("Failed to build extractor: {0}")]
    Extractor(#[from] ExtractorError),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Locations of the configuration files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub features: PathBuf,
    pub synonyms: PathBuf,
    pub departments: PathBuf,
    pub model: PathBuf,
    pub labels: PathBuf,
}

impl ConfigPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir<P: AsRef<Path>>(dir: P) -> Self {
        let dir = dir.as_ref();
        Self {
            features: dir.join(FEATURES_FILE),
            synonyms: dir.join(SYNONYMS_FILE),
            departments: dir.join(DEPARTMENTS_FILE),
            model: dir.join(MODEL_FILE),
            labels: dir.join(LABELS_FILE),
        }
    }
}

/// Load the ordered feature schema.
pub fn load_schema(path: &Path) -> ConfigResult<FeatureSchema> {
    let symptoms: Vec<String> = read_json(path)?;
    let schema = FeatureSchema::new(symptoms)?;
    info!(path = %path.display(), symptoms = schema.len(), "Loaded feature schema");
    Ok(schema)
}

/// Load the synonym seed. A missing file is an empty seed.
pub fn load_synonym_seed(path: &Path) -> ConfigResult<BTreeMap<String, Vec<String>>> {
    match read_optional_json(path)? {
        Some(seed) => Ok(seed),
        None => {
            info!(path = %path.display(), "No synonym seed, using expander output only");
            Ok(BTreeMap::new())
        }
    }
}

/// Load the condition → department map. A missing file is an empty map.
pub fn load_department_map(path: &Path) -> ConfigResult<DepartmentMap> {
    match read_optional_json(path)? {
        Some(entries) => {
            let map = DepartmentMap::from_entries(entries);
            info!(path = %path.display(), entries = map.len(), "Loaded department map");
            Ok(map)
        }
        None => {
            warn!(path = %path.display(), "Department map missing, routing by symptom category only");
            Ok(DepartmentMap::default())
        }
    }
}

/// Read and parse a JSON file.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}

fn read_optional_json<T: DeserializeOwned>(path: &Path) -> ConfigResult<Option<T>> {
    match read_json(path) {
        Ok(value) => Ok(Some(value)),
        Err(ConfigError::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_paths_in_dir() {
        let paths = ConfigPaths::in_dir("/etc/triage");
        assert_eq!(paths.features, PathBuf::from("/etc/triage/features.json"));
        assert_eq!(paths.labels, PathBuf::from("/etc/triage/labels.json"));
    }

    #[test]
    fn test_load_schema() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, FEATURES_FILE, r#"["itching", "skin_rash", "cough"]"#);

        let schema = load_schema(&path).unwrap();
        assert_eq!(schema.len(), 3);
        assert_eq!(schema.index_of("cough"), Some(2));
    }

    #[test]
    fn test_schema_errors() {
        let dir = TempDir::new().unwrap();

        let missing = load_schema(&dir.path().join(FEATURES_FILE)).unwrap_err();
        assert!(matches!(missing, ConfigError::Io { .. }));

        let malformed = write(&dir, "bad.json", r#"{"itching": 1}"#);
        assert!(matches!(load_schema(&malformed).unwrap_err(), ConfigError::Json { .. }));

        let duplicate = write(&dir, "dup.json", r#"["cough", "cough"]"#);
        assert!(matches!(load_schema(&duplicate).unwrap_err(), ConfigError::Schema(_)));
    }

    #[test]
    fn test_optional_files_missing() {
        let dir = TempDir::new().unwrap();
        let paths = ConfigPaths::in_dir(dir.path());

        assert!(load_synonym_seed(&paths.synonyms).unwrap().is_empty());
        assert!(load_department_map(&paths.departments).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_optional_file_is_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, DEPARTMENTS_FILE, "not json");
        assert!(matches!(
            load_department_map(&path).unwrap_err(),
            ConfigError::Json { .. }
        ));
    }

    #[test]
    fn test_load_department_map() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, DEPARTMENTS_FILE, r#"{"Malaria": "Infectious Disease"}"#);

        let map = load_department_map(&path).unwrap();
        assert_eq!(map.lookup("malaria"), Some("Infectious Disease"));
    }
}
