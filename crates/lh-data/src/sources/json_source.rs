use std::path::Path;

use serde_json::Value;

use crate::config::DataFormat;
use crate::DataError;

/// Read sample objects from a JSON array file or a JSON-lines file
pub fn read_json_samples(path: &Path, format: DataFormat) -> Result<Vec<Value>, DataError> {
    let text = std::fs::read_to_string(path)?;

    match format {
        DataFormat::Json => Ok(serde_json::from_str::<Vec<Value>>(&text)?),
        DataFormat::JsonLines => text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str::<Value>(line).map_err(DataError::from))
            .collect(),
        DataFormat::Csv => Err(DataError::UnsupportedFormat(
            "CSV files are read by the CSV source".to_string(),
        )),
    }
}
