//! Filter predicates a panel can ask a data source to apply

use std::fmt;

use crate::QueryError;

/// Predicate narrowing a data source to matching records
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ViewFilter {
    /// Records whose value at `field` equals `value`
    FieldEquals { field: String, value: String },

    /// Records whose label collection `collection` holds at least one label
    /// element with `label`. Non-matching label elements are hidden.
    LabelContains { collection: String, label: String },

    /// Records whose tag set contains `tag`
    TagContains { tag: String },
}

impl ViewFilter {
    /// Exact equality on a field path
    pub fn field_equals(field: impl Into<String>, value: impl Into<String>) -> Result<Self, QueryError> {
        let field = field.into();
        if field.trim().is_empty() {
            return Err(QueryError::invalid_filter("field path is empty"));
        }
        Ok(ViewFilter::FieldEquals { field, value: value.into() })
    }

    /// Label containment on a root label collection
    pub fn label_contains(collection: impl Into<String>, label: impl Into<String>) -> Result<Self, QueryError> {
        let collection = collection.into();
        if collection.trim().is_empty() {
            return Err(QueryError::invalid_filter("label collection name is empty"));
        }
        Ok(ViewFilter::LabelContains { collection, label: label.into() })
    }

    /// Tag membership
    pub fn tag_contains(tag: impl Into<String>) -> Result<Self, QueryError> {
        let tag = tag.into();
        if tag.is_empty() {
            return Err(QueryError::invalid_filter("tag is empty"));
        }
        Ok(ViewFilter::TagContains { tag })
    }

    /// The top-level field this filter reads
    pub fn root_field(&self) -> &str {
        match self {
            ViewFilter::FieldEquals { field, .. } => field.split('.').next().unwrap_or(field),
            ViewFilter::LabelContains { collection, .. } => collection,
            ViewFilter::TagContains { .. } => "tags",
        }
    }
}

impl fmt::Display for ViewFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViewFilter::FieldEquals { field, value } => write!(f, "{} == {:?}", field, value),
            ViewFilter::LabelContains { collection, label } => {
                write!(f, "{} contains label {:?}", collection, label)
            }
            ViewFilter::TagContains { tag } => write!(f, "tags contains {:?}", tag),
        }
    }
}
