//! Per-file dataset configuration

use std::path::{Path, PathBuf};
use serde::{Serialize, Deserialize};

use super::null_handling::NullConfig;
use crate::DataError;

/// Suffix appended to a data file's name to find its configuration
pub const SIDECAR_SUFFIX: &str = ".dataset.json";

/// On-disk layout of a samples file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataFormat {
    /// A JSON array of sample objects
    Json,
    /// One sample object per line
    JsonLines,
    /// Flat table, one column per field path
    Csv,
}

impl DataFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(DataFormat::Json),
            "jsonl" | "ndjson" => Some(DataFormat::JsonLines),
            "csv" => Some(DataFormat::Csv),
            _ => None,
        }
    }
}

/// How to turn a file into a dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the samples file
    pub path: PathBuf,

    /// Dataset name; defaults to the file stem
    pub name: Option<String>,

    /// Explicit format; detected from the extension when unset
    pub format: Option<DataFormat>,

    /// CSV column holding sample tags
    pub tags_column: String,

    /// Separator between tags inside the tags column
    pub tag_delimiter: String,

    /// Field paths that exist even when no sample sets them
    pub declared_fields: Vec<String>,

    /// Null handling for CSV cells
    pub null_config: NullConfig,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::new(),
            name: None,
            format: None,
            tags_column: "tags".to_string(),
            tag_delimiter: ";".to_string(),
            declared_fields: Vec::new(),
            null_config: NullConfig::default(),
        }
    }
}

impl DatasetConfig {
    /// Create a configuration for a file with default settings
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Configuration for `path`, read from its sidecar file when one exists
    pub fn for_file(path: impl Into<PathBuf>) -> Result<Self, DataError> {
        let path = path.into();
        let sidecar = Self::sidecar_path(&path);

        if !sidecar.exists() {
            return Ok(Self::new(path));
        }

        tracing::info!("Reading dataset config from {:?}", sidecar);
        let text = std::fs::read_to_string(&sidecar)?;
        let mut config: DatasetConfig = serde_json::from_str(&text)?;
        config.path = path;
        Ok(config)
    }

    /// Location of the sidecar configuration for a data file
    pub fn sidecar_path(path: &Path) -> PathBuf {
        let mut name = path.as_os_str().to_os_string();
        name.push(SIDECAR_SUFFIX);
        PathBuf::from(name)
    }

    /// Get the dataset name
    pub fn dataset_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| {
            self.path
                .file_stem()
                .and_then(|n| n.to_str())
                .unwrap_or("unknown")
                .to_string()
        })
    }

    /// The configured format, or the one implied by the file extension
    pub fn resolved_format(&self) -> Result<DataFormat, DataError> {
        self.format
            .or_else(|| DataFormat::from_path(&self.path))
            .ok_or_else(|| DataError::UnsupportedFormat(self.path.display().to_string()))
    }
}
