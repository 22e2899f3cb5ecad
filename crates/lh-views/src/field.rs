//! Classification of the field a histogram groups by

use lh_core::{QueryError, ViewFilter};

/// How a clicked bucket of a field turns into a filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldKind {
    /// A path ending in `.label` inside a label collection rooted at `root`
    LabelPath { root: String },
    /// The sample tag list
    TagField,
    /// Any other field, matched by exact equality
    ScalarField,
}

impl FieldKind {
    /// Classify a dotted field path
    pub fn classify(field: &str) -> Self {
        if field.ends_with(".label") {
            let root = field.split('.').next().unwrap_or_default();
            FieldKind::LabelPath { root: root.to_string() }
        } else if field == "tags" {
            FieldKind::TagField
        } else {
            FieldKind::ScalarField
        }
    }
}

/// The field a histogram groups by, classified once when it is set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetField {
    path: String,
    kind: FieldKind,
}

impl TargetField {
    pub fn new(path: impl Into<String>) -> Self {
        let path = path.into();
        let kind = FieldKind::classify(&path);
        Self { path, kind }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    /// Filter selecting the records behind the bucket `key`
    pub fn filter_for(&self, key: &str) -> Result<ViewFilter, QueryError> {
        match &self.kind {
            FieldKind::LabelPath { root } => ViewFilter::label_contains(root.as_str(), key),
            FieldKind::TagField => ViewFilter::tag_contains(key),
            FieldKind::ScalarField => ViewFilter::field_equals(self.path.as_str(), key),
        }
    }
}
