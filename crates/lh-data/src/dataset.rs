//! Named, in-memory collection of samples

use serde_json::Value;
use uuid::Uuid;

use crate::schema::{FieldSchema, FieldType};
use crate::view::SampleView;
use crate::DataError;

/// A dataset of JSON samples and the schema they populate
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    schema: FieldSchema,
    samples: Vec<Value>,
}

impl Dataset {
    /// Create an empty dataset
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            schema: FieldSchema::new(),
            samples: Vec::new(),
        }
    }

    /// Declare a field so it exists even before any sample sets it
    pub fn declare_field(&mut self, path: &str, field_type: FieldType) {
        self.schema.declare(path, field_type);
    }

    /// Add a sample.
    ///
    /// Samples must be JSON objects. A missing `id` is generated and a
    /// missing `tags` becomes an empty list.
    pub fn add_sample(&mut self, sample: Value) -> Result<(), DataError> {
        let index = self.samples.len();
        let Value::Object(mut map) = sample else {
            return Err(DataError::InvalidSample {
                index,
                reason: "sample is not a JSON object".to_string(),
            });
        };

        if !map.contains_key("id") {
            map.insert("id".to_string(), Value::String(Uuid::new_v4().simple().to_string()));
        }

        match map.get("tags") {
            None | Some(Value::Null) => {
                map.insert("tags".to_string(), Value::Array(Vec::new()));
            }
            Some(Value::Array(tags)) if tags.iter().all(Value::is_string) => {}
            Some(_) => {
                return Err(DataError::InvalidSample {
                    index,
                    reason: "tags must be a list of strings".to_string(),
                });
            }
        }

        let sample = Value::Object(map);
        self.schema.merge_sample(&sample);
        self.samples.push(sample);
        Ok(())
    }

    /// Add several samples, stopping at the first invalid one
    pub fn add_samples(&mut self, samples: impl IntoIterator<Item = Value>) -> Result<usize, DataError> {
        let mut added = 0;
        for sample in samples {
            self.add_sample(sample)?;
            added += 1;
        }
        Ok(added)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn schema(&self) -> &FieldSchema {
        &self.schema
    }

    pub fn samples(&self) -> &[Value] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Unfiltered view over this dataset
    pub fn into_view(self) -> SampleView {
        SampleView::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_sample_fills_defaults() {
        let mut dataset = Dataset::new("animals");
        dataset.add_sample(json!({"filepath": "/data/0001.jpg"})).unwrap();

        let sample = &dataset.samples()[0];
        assert!(sample["id"].is_string());
        assert_eq!(sample["tags"], json!([]));
    }

    #[test]
    fn test_add_sample_rejects_non_objects() {
        let mut dataset = Dataset::new("animals");
        let err = dataset.add_sample(json!(["not", "a", "sample"])).unwrap_err();
        assert!(matches!(err, DataError::InvalidSample { index: 0, .. }));
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_add_sample_rejects_bad_tags() {
        let mut dataset = Dataset::new("animals");
        dataset.add_sample(json!({"tags": ["train"]})).unwrap();
        let err = dataset.add_sample(json!({"tags": "train"})).unwrap_err();
        assert!(matches!(err, DataError::InvalidSample { index: 1, .. }));
        assert_eq!(dataset.len(), 1);
    }

    #[test]
    fn test_schema_widens_with_samples() {
        let mut dataset = Dataset::new("animals");
        assert!(!dataset.schema().contains("size"));

        dataset.add_sample(json!({"size": "small"})).unwrap();
        assert!(dataset.schema().contains("size"));
    }
}
