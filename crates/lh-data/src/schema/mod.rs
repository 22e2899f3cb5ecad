use std::collections::BTreeMap;

use serde_json::Value;

/// Fields every dataset exposes, whether or not a sample sets them
pub const DEFAULT_FIELDS: [(&str, FieldType); 3] = [
    ("id", FieldType::Scalar),
    ("filepath", FieldType::Scalar),
    ("tags", FieldType::List),
];

/// Shape of the values stored under a field path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// String, number or boolean
    Scalar,
    /// List of scalars
    List,
    /// Embedded document
    Document,
    /// List of embedded documents (e.g. detections)
    DocumentList,
    /// Only nulls observed so far
    Unknown,
}

impl FieldType {
    fn of(value: &Value) -> Self {
        match value {
            Value::Null => FieldType::Unknown,
            Value::Object(_) => FieldType::Document,
            Value::Array(items) => {
                if items.iter().any(Value::is_object) {
                    FieldType::DocumentList
                } else {
                    FieldType::List
                }
            }
            _ => FieldType::Scalar,
        }
    }

    /// Whether values under this field can be counted
    pub fn is_countable(&self) -> bool {
        matches!(self, FieldType::Scalar | FieldType::List | FieldType::Unknown)
    }
}

/// Dotted field paths known to a dataset.
///
/// Paths through lists of documents are flattened, so a detections field
/// contributes `ground_truth`, `ground_truth.detections` and
/// `ground_truth.detections.label`.
#[derive(Debug, Clone)]
pub struct FieldSchema {
    fields: BTreeMap<String, FieldType>,
}

impl FieldSchema {
    /// Create a schema holding only the default fields
    pub fn new() -> Self {
        let fields = DEFAULT_FIELDS
            .iter()
            .map(|(name, ty)| (name.to_string(), *ty))
            .collect();
        Self { fields }
    }

    /// Build a schema from sample data
    pub fn from_samples<'a>(samples: impl IntoIterator<Item = &'a Value>) -> Self {
        let mut schema = Self::new();
        for sample in samples {
            schema.merge_sample(sample);
        }
        schema
    }

    /// Declare a field path up front, along with its parents
    pub fn declare(&mut self, path: &str, field_type: FieldType) {
        let mut prefix = String::new();
        let segments: Vec<&str> = path.split('.').collect();
        for (idx, segment) in segments.iter().enumerate() {
            if !prefix.is_empty() {
                prefix.push('.');
            }
            prefix.push_str(segment);
            let ty = if idx + 1 == segments.len() {
                field_type
            } else {
                FieldType::Document
            };
            self.record(&prefix, ty);
        }
    }

    /// Widen the schema with every path present in `sample`
    pub fn merge_sample(&mut self, sample: &Value) {
        self.observe("", sample);
    }

    pub fn contains(&self, path: &str) -> bool {
        self.fields.contains_key(path)
    }

    pub fn field_type(&self, path: &str) -> Option<FieldType> {
        self.fields.get(path).copied()
    }

    /// All known paths, sorted
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Paths whose values can be counted, sorted
    pub fn countable_paths(&self) -> Vec<String> {
        self.fields
            .iter()
            .filter(|(_, ty)| ty.is_countable())
            .map(|(path, _)| path.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn observe(&mut self, prefix: &str, value: &Value) {
        let Value::Object(map) = value else {
            return;
        };

        for (key, child) in map {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };

            self.record(&path, FieldType::of(child));

            match child {
                Value::Object(_) => self.observe(&path, child),
                Value::Array(items) => {
                    for item in items.iter().filter(|item| item.is_object()) {
                        self.observe(&path, item);
                    }
                }
                _ => {}
            }
        }
    }

    fn record(&mut self, path: &str, field_type: FieldType) {
        match self.fields.get_mut(path) {
            Some(existing) if *existing == FieldType::Unknown => *existing = field_type,
            Some(_) => {}
            None => {
                self.fields.insert(path.to_string(), field_type);
            }
        }
    }
}

impl Default for FieldSchema {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_fields_always_present() {
        let schema = FieldSchema::new();
        assert!(schema.contains("id"));
        assert!(schema.contains("filepath"));
        assert_eq!(schema.field_type("tags"), Some(FieldType::List));
    }

    #[test]
    fn test_paths_through_document_lists() {
        let schema = FieldSchema::from_samples(&[json!({
            "ground_truth": {"detections": [{"label": "cat", "confidence": 0.8}]},
            "size": "small",
        })]);

        assert_eq!(schema.field_type("ground_truth"), Some(FieldType::Document));
        assert_eq!(schema.field_type("ground_truth.detections"), Some(FieldType::DocumentList));
        assert_eq!(schema.field_type("ground_truth.detections.label"), Some(FieldType::Scalar));
        assert_eq!(schema.field_type("size"), Some(FieldType::Scalar));
        assert!(!schema.contains("ground_truth.label"));
    }

    #[test]
    fn test_null_fields_resolve_once_observed() {
        let mut schema = FieldSchema::new();
        schema.merge_sample(&json!({"weather": null}));
        assert_eq!(schema.field_type("weather"), Some(FieldType::Unknown));

        schema.merge_sample(&json!({"weather": "rain"}));
        assert_eq!(schema.field_type("weather"), Some(FieldType::Scalar));
    }

    #[test]
    fn test_declare_adds_parents() {
        let mut schema = FieldSchema::new();
        schema.declare("predictions.detections.label", FieldType::Scalar);

        assert_eq!(schema.field_type("predictions"), Some(FieldType::Document));
        assert!(schema.contains("predictions.detections"));
        assert!(schema.countable_paths().contains(&"predictions.detections.label".to_string()));
    }
}
