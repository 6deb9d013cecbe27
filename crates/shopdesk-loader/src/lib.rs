//! Record file loading
//!
//! Each `<name>.json` file in the data directory holds one kind of record,
//! either as a bare JSON array of objects or wrapped as `{ "<name>": [...] }`
//! (the shape list endpoints return).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub mod error;

pub use error::LoadError;

/// A single record as stored on disk
pub type RawRecord = Map<String, Value>;

/// Records read from one file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecordSet {
    /// File stem, e.g. `customers`
    pub name: String,
    /// Path the records were read from, if any
    pub source: Option<PathBuf>,
    pub records: Vec<RawRecord>,
}

impl RecordSet {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ==================== Source Trait ====================

/// Record source reference type
pub type SourceRef = Arc<dyn RecordSourceTrait>;

/// Trait for record sources
#[async_trait]
pub trait RecordSourceTrait: Send + Sync {
    /// Parse file content belonging to the record set `name`
    async fn parse(&self, name: &str, content: &str) -> Result<RecordSet, LoadError>;

    /// Read and parse a single file; the record set is named after the file stem
    async fn load_file(&self, path: PathBuf) -> Result<RecordSet, LoadError>;

    /// Read every record file in a directory, sorted by file name
    async fn load_dir(&self, dir: PathBuf) -> Result<Vec<RecordSet>, LoadError>;
}

/// JSON record source
#[derive(Debug, Default)]
pub struct JsonRecordSource;

impl JsonRecordSource {
    fn parse_value(name: &str, location: &str, value: Value) -> Result<Vec<RawRecord>, LoadError> {
        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut wrapper) => match wrapper.remove(name) {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(LoadError::InvalidLayout {
                        location: location.to_string(),
                        message: format!("expected an array or an object with a '{}' array", name),
                    })
                }
            },
            _ => {
                return Err(LoadError::InvalidLayout {
                    location: location.to_string(),
                    message: "expected a JSON array of records".to_string(),
                })
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::Object(record) => Ok(record),
                other => Err(LoadError::InvalidLayout {
                    location: location.to_string(),
                    message: format!("record {} is not an object: {}", i, other),
                }),
            })
            .collect()
    }

    fn stem(path: &Path) -> String {
        path.file_stem()
            .map(|s| s.to_string_lossy().to_lowercase())
            .unwrap_or_default()
    }
}

#[async_trait]
impl RecordSourceTrait for JsonRecordSource {
    async fn parse(&self, name: &str, content: &str) -> Result<RecordSet, LoadError> {
        let value: Value = serde_json::from_str(content).map_err(|e| LoadError::InvalidJson {
            location: name.to_string(),
            message: e.to_string(),
        })?;

        Ok(RecordSet {
            name: name.to_string(),
            source: None,
            records: Self::parse_value(name, name, value)?,
        })
    }

    async fn load_file(&self, path: PathBuf) -> Result<RecordSet, LoadError> {
        let content = tokio::fs::read_to_string(&path).await?;
        let name = Self::stem(&path);
        let location = path.to_string_lossy().to_string();

        let value: Value = serde_json::from_str(&content).map_err(|e| LoadError::InvalidJson {
            location: location.clone(),
            message: e.to_string(),
        })?;

        let records = Self::parse_value(&name, &location, value)?;
        log::debug!("Loaded {} records from {}", records.len(), location);

        Ok(RecordSet {
            name,
            source: Some(path),
            records,
        })
    }

    async fn load_dir(&self, dir: PathBuf) -> Result<Vec<RecordSet>, LoadError> {
        if !dir.is_dir() {
            return Err(LoadError::DirectoryNotFound {
                path: dir.to_string_lossy().to_string(),
            });
        }

        let pattern = dir.join("*.json");
        let pattern_str = pattern.to_string_lossy().to_string();
        let paths = glob::glob(&pattern_str)
            .map_err(|_| LoadError::InvalidPattern { pattern: pattern_str.clone() })?;

        let mut files: Vec<PathBuf> = paths.flatten().filter(|p| p.is_file()).collect();
        files.sort();

        let mut sets = Vec::with_capacity(files.len());
        for file in files {
            sets.push(self.load_file(file).await?);
        }

        Ok(sets)
    }
}

// ==================== Tests ====================
