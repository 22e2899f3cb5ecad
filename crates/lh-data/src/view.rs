//! Filterable views over a dataset

use std::sync::Arc;

use lh_core::{CountMapping, DataSource, QueryError, ViewFilter};
use serde_json::Value;

use crate::dataset::Dataset;
use crate::path::{resolve, value_key};
use crate::schema::FieldSchema;

/// A view over a shared [`Dataset`], optionally narrowed by one filter.
///
/// Filters always apply to the full dataset, never on top of the current
/// view, so applying the same filter again yields the same view.
#[derive(Debug, Clone)]
pub struct SampleView {
    dataset: Arc<Dataset>,
    filter: Option<ViewFilter>,
    /// Matching samples with label collections already narrowed; `None` when unfiltered
    visible: Option<Arc<Vec<Value>>>,
}

impl SampleView {
    /// Unfiltered view over a dataset
    pub fn new(dataset: Dataset) -> Self {
        Self::from_shared(Arc::new(dataset))
    }

    /// Unfiltered view over a shared dataset
    pub fn from_shared(dataset: Arc<Dataset>) -> Self {
        Self {
            dataset,
            filter: None,
            visible: None,
        }
    }

    pub fn dataset(&self) -> &Arc<Dataset> {
        &self.dataset
    }

    pub fn schema(&self) -> &FieldSchema {
        self.dataset.schema()
    }

    /// Samples visible through this view
    pub fn samples(&self) -> &[Value] {
        match &self.visible {
            Some(visible) => visible.as_slice(),
            None => self.dataset.samples(),
        }
    }

    /// Build the view of the dataset narrowed by `filter`
    pub fn filtered(&self, filter: &ViewFilter) -> Result<SampleView, QueryError> {
        let schema = self.dataset.schema();
        match filter {
            ViewFilter::FieldEquals { field, .. } if !schema.contains(field) => {
                return Err(QueryError::invalid_field(field.clone()));
            }
            ViewFilter::LabelContains { collection, .. } if !schema.contains(collection) => {
                return Err(QueryError::invalid_field(collection.clone()));
            }
            _ => {}
        }

        let visible: Vec<Value> = self
            .dataset
            .samples()
            .iter()
            .filter_map(|sample| select(sample, filter))
            .collect();

        tracing::debug!(
            "Filter '{}' on '{}' kept {} of {} samples",
            filter,
            self.dataset.name(),
            visible.len(),
            self.dataset.len()
        );

        Ok(SampleView {
            dataset: self.dataset.clone(),
            filter: Some(filter.clone()),
            visible: Some(Arc::new(visible)),
        })
    }
}

/// The sample as seen through `filter`, or `None` if it doesn't match
fn select(sample: &Value, filter: &ViewFilter) -> Option<Value> {
    match filter {
        ViewFilter::FieldEquals { field, value } => resolve(sample, field)
            .into_iter()
            .any(|v| value_key(v).as_deref() == Some(value.as_str()))
            .then(|| sample.clone()),
        ViewFilter::TagContains { tag } => sample
            .get("tags")
            .and_then(Value::as_array)
            .is_some_and(|tags| tags.iter().any(|t| t.as_str() == Some(tag.as_str())))
            .then(|| sample.clone()),
        ViewFilter::LabelContains { collection, label } => {
            let mut projected = sample.clone();
            let kept = projected
                .get_mut(collection.as_str())
                .map(|root| retain_labels(root, label))
                .unwrap_or(0);
            (kept > 0).then_some(projected)
        }
    }
}

fn is_label(value: &Value) -> bool {
    value.as_object().is_some_and(|map| map.contains_key("label"))
}

fn has_label(value: &Value, label: &str) -> bool {
    value.get("label").and_then(value_key).as_deref() == Some(label)
}

/// Drop label elements under `node` whose label differs; returns how many remain.
///
/// Descends through nested documents and lists at any depth.
fn retain_labels(node: &mut Value, label: &str) -> usize {
    if is_label(node) {
        if has_label(node, label) {
            return 1;
        }
        *node = Value::Null;
        return 0;
    }

    match node {
        Value::Array(items) => {
            items.retain(|item| !is_label(item) || has_label(item, label));
            items.iter_mut().map(|item| retain_labels(item, label)).sum()
        }
        Value::Object(map) => map.values_mut().map(|child| retain_labels(child, label)).sum(),
        _ => 0,
    }
}

impl DataSource for SampleView {
    fn source_name(&self) -> &str {
        self.dataset.name()
    }

    fn len(&self) -> usize {
        self.samples().len()
    }

    fn has_field(&self, field: &str) -> bool {
        self.dataset.schema().contains(field)
    }

    fn countable_fields(&self) -> Vec<String> {
        self.dataset.schema().countable_paths()
    }

    fn count_values(&self, field: &str) -> Result<CountMapping, QueryError> {
        if !self.has_field(field) {
            return Err(QueryError::invalid_field(field));
        }

        let mut counts = CountMapping::default();
        for sample in self.samples() {
            for value in resolve(sample, field) {
                if let Some(key) = value_key(value) {
                    *counts.entry(key).or_insert(0) += 1;
                }
            }
        }

        tracing::debug!(
            "Counted {} distinct values of '{}' over {} samples",
            counts.len(),
            field,
            self.len()
        );
        Ok(counts)
    }

    fn active_filter(&self) -> Option<&ViewFilter> {
        self.filter.as_ref()
    }

    fn apply_filter(&self, filter: &ViewFilter) -> Result<Box<dyn DataSource>, QueryError> {
        Ok(Box::new(self.filtered(filter)?))
    }

    fn clear_filter(&self) -> Box<dyn DataSource> {
        Box::new(SampleView::from_shared(self.dataset.clone()))
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
