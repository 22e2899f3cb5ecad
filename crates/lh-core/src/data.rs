//! Data source contract consumed by panels

use ahash::AHashMap;

use crate::{QueryError, ViewFilter};

/// Occurrence count per distinct value of a field.
///
/// Unordered; consumers that need a stable order sort by key themselves.
pub type CountMapping = AHashMap<String, u64>;

/// A queryable, filterable view over a collection of records.
///
/// Views are immutable: filtering never changes `self`, it hands back a new
/// view over the same records.
pub trait DataSource: Send + Sync {
    /// Get the source name (dataset name or file path)
    fn source_name(&self) -> &str;

    /// Number of records visible through this view
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `field` is part of the schema
    fn has_field(&self, field: &str) -> bool;

    /// Field paths whose values can be counted, sorted
    fn countable_fields(&self) -> Vec<String>;

    /// Count occurrences of every distinct value of `field`.
    ///
    /// List-valued fields are unwound so each element is counted. Fails with
    /// [`QueryError::InvalidField`] if the field is not in the schema.
    fn count_values(&self, field: &str) -> Result<CountMapping, QueryError>;

    /// The filter currently narrowing this view, if any
    fn active_filter(&self) -> Option<&ViewFilter>;

    /// Return a view of the underlying records narrowed by `filter`.
    ///
    /// Replaces any filter already active on `self`.
    fn apply_filter(&self, filter: &ViewFilter) -> Result<Box<dyn DataSource>, QueryError>;

    /// Return the unfiltered view of the underlying records
    fn clear_filter(&self) -> Box<dyn DataSource>;

    /// Get as any for downcasting
    fn as_any(&self) -> &dyn std::any::Any;
}
