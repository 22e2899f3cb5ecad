use std::fs::File;
use std::io::BufReader;

use csv::{ReaderBuilder, StringRecord};
use serde_json::{Map, Number, Value};

use crate::config::{DatasetConfig, NullConfig};
use crate::path::insert;
use crate::DataError;

/// Inferred type of a CSV column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnType {
    Integer,
    Float,
    Boolean,
    Text,
}

/// Read a flat CSV file into samples.
///
/// Each header is a dotted field path, so a `ground_truth.label` column
/// becomes a nested classification. The tags column is split on the
/// configured delimiter.
pub fn read_csv_samples(config: &DatasetConfig) -> Result<Vec<Value>, DataError> {
    let file = File::open(&config.path)?;
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(true)
        .from_reader(BufReader::new(file));

    let headers = csv_reader.headers()?.clone();
    let records = csv_reader.records().collect::<Result<Vec<_>, _>>()?;

    let column_types: Vec<ColumnType> = (0..headers.len())
        .map(|idx| detect_column_type(&records, idx, &config.null_config))
        .collect();

    tracing::debug!(
        "CSV {:?}: {} columns, {} rows",
        config.path,
        headers.len(),
        records.len()
    );

    let samples = records
        .iter()
        .map(|record| {
            let mut sample = Map::new();
            for (idx, header) in headers.iter().enumerate() {
                let cell = record.get(idx).unwrap_or("");
                let value = if header == config.tags_column {
                    split_tags(cell, &config.tag_delimiter)
                } else if config.null_config.is_null(cell) {
                    Value::Null
                } else {
                    typed_value(cell, column_types[idx])
                };
                insert(&mut sample, header, value);
            }
            Value::Object(sample)
        })
        .collect();

    Ok(samples)
}

/// Detect column type from the non-null cells
fn detect_column_type(records: &[StringRecord], col_idx: usize, nulls: &NullConfig) -> ColumnType {
    let mut is_int = true;
    let mut is_float = true;
    let mut is_bool = true;
    let mut seen = false;

    for value in records.iter().filter_map(|row| row.get(col_idx)) {
        if nulls.is_null(value) {
            continue;
        }
        seen = true;
        let value = value.trim();

        if is_int && value.parse::<i64>().is_err() {
            is_int = false;
        }
        if is_float && value.parse::<f64>().is_err() {
            is_float = false;
        }
        if is_bool && !matches!(value.to_lowercase().as_str(), "true" | "false") {
            is_bool = false;
        }
    }

    if !seen {
        ColumnType::Text
    } else if is_int {
        ColumnType::Integer
    } else if is_float {
        ColumnType::Float
    } else if is_bool {
        ColumnType::Boolean
    } else {
        ColumnType::Text
    }
}

fn typed_value(cell: &str, column_type: ColumnType) -> Value {
    let trimmed = cell.trim();
    match column_type {
        ColumnType::Integer => trimmed
            .parse::<i64>()
            .map(Value::from)
            .unwrap_or_else(|_| Value::String(cell.to_string())),
        ColumnType::Float => trimmed
            .parse::<f64>()
            .ok()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::String(cell.to_string())),
        ColumnType::Boolean => Value::Bool(trimmed.eq_ignore_ascii_case("true")),
        ColumnType::Text => Value::String(cell.to_string()),
    }
}

fn split_tags(cell: &str, delimiter: &str) -> Value {
    let tags = cell
        .split(delimiter)
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(|tag| Value::String(tag.to_string()))
        .collect();
    Value::Array(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_split_tags() {
        assert_eq!(split_tags("train; hard;", ";"), json!(["train", "hard"]));
        assert_eq!(split_tags("", ";"), json!([]));
    }

    #[test]
    fn test_typed_values() {
        assert_eq!(typed_value("42", ColumnType::Integer), json!(42));
        assert_eq!(typed_value("0.25", ColumnType::Float), json!(0.25));
        assert_eq!(typed_value("TRUE", ColumnType::Boolean), json!(true));
        assert_eq!(typed_value("cat", ColumnType::Text), json!("cat"));
    }
}
