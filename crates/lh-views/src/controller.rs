//! Histogram view controller: field selection, counts, click-to-filter

use lh_core::{DataSource, QueryError, ViewFilter};

use crate::chart::ChartData;
use crate::config::HistogramConfig;
use crate::field::{FieldKind, TargetField};

/// Whether the controller has narrowed the data source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FilterState {
    #[default]
    Unfiltered,
    Filtered(ViewFilter),
}

/// Owns the target field and the chart derived from it.
///
/// Every operation either completes or leaves the controller untouched.
#[derive(Debug, Clone)]
pub struct HistogramController {
    config: HistogramConfig,
    target: Option<TargetField>,
    chart: Option<ChartData>,
    state: FilterState,
}

impl HistogramController {
    pub fn new(config: HistogramConfig) -> Self {
        Self {
            config,
            target: None,
            chart: None,
            state: FilterState::Unfiltered,
        }
    }

    pub fn config(&self) -> &HistogramConfig {
        &self.config
    }

    /// The committed target field, if any load has succeeded or state was restored
    pub fn target_field(&self) -> Option<&str> {
        self.target.as_ref().map(TargetField::path)
    }

    pub fn field_kind(&self) -> Option<&FieldKind> {
        self.target.as_ref().map(TargetField::kind)
    }

    /// Chart from the last successful load
    pub fn chart(&self) -> Option<&ChartData> {
        self.chart.as_ref()
    }

    pub fn state(&self) -> &FilterState {
        &self.state
    }

    /// Restore a previously saved target field without loading.
    ///
    /// A blank field counts as unset and is ignored.
    pub fn restore_target_field(&mut self, field: &str) {
        if is_blank(field) {
            tracing::debug!("Ignoring blank saved target field");
            return;
        }
        if self.target_field() != Some(field) {
            self.target = Some(TargetField::new(field));
            self.chart = None;
        }
    }

    /// Field a load would use: the override, else the stored field, else the default
    pub fn resolve_field(&self, field: Option<&str>) -> String {
        field
            .filter(|f| !is_blank(f))
            .or(self.target_field().filter(|f| !is_blank(f)))
            .unwrap_or(self.config.default_field.as_str())
            .to_string()
    }

    /// Count the target field over `source` and rebuild the chart.
    ///
    /// The field is committed only if counting succeeds.
    pub fn load(&mut self, source: &dyn DataSource, field: Option<&str>) -> Result<&ChartData, QueryError> {
        let field = self.resolve_field(field);
        let counts = source.count_values(&field).map_err(|e| {
            tracing::error!("Failed to count values of '{}' on '{}': {}", field, source.source_name(), e);
            e
        })?;

        let chart = ChartData::from_counts(&field, &counts, self.config.secondary_series);
        tracing::info!(
            "Histogram of '{}' on '{}': {} buckets, {} values",
            field,
            source.source_name(),
            chart.len(),
            chart.total()
        );

        if self.target_field() != Some(field.as_str()) {
            self.target = Some(TargetField::new(field));
        }
        Ok(&*self.chart.insert(chart))
    }

    /// Recompute after the data source changed; same as a load with no override
    pub fn on_data_source_changed(&mut self, source: &dyn DataSource) -> Result<&ChartData, QueryError> {
        self.load(source, None)
    }

    /// Filter selecting the records behind bucket `key`, or `None` if no field is set
    pub fn filter_for(&self, key: &str) -> Result<Option<ViewFilter>, QueryError> {
        self.target
            .as_ref()
            .filter(|target| !is_blank(target.path()))
            .map(|target| target.filter_for(key))
            .transpose()
    }

    /// Narrow `source` to the records behind bucket `key`.
    ///
    /// Returns `None` without touching the source when no field is set.
    pub fn select_bar(&mut self, source: &dyn DataSource, key: &str) -> Result<Option<Box<dyn DataSource>>, QueryError> {
        let Some(filter) = self.filter_for(key)? else {
            tracing::warn!("Ignoring selection of '{}': no target field", key);
            return Ok(None);
        };

        let view = source.apply_filter(&filter)?;
        tracing::info!("Applied filter {} ({} matching)", filter, view.len());

        self.state = FilterState::Filtered(filter);
        Ok(Some(view))
    }

    /// Clear any filter on `source` and reload over the unfiltered records.
    ///
    /// Returns the unfiltered view for the host to display.
    pub fn reset(&mut self, source: &dyn DataSource) -> Result<Box<dyn DataSource>, QueryError> {
        let cleared = source.clear_filter();
        self.load(cleared.as_ref(), None)?;

        tracing::info!("Reset histogram on '{}'", cleared.source_name());
        self.state = FilterState::Unfiltered;
        Ok(cleared)
    }
}

fn is_blank(field: &str) -> bool {
    field.trim().is_empty()
}

impl Default for HistogramController {
    fn default() -> Self {
        Self::new(HistogramConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TARGET_FIELD;
    use lh_core::CountMapping;
    use parking_lot::Mutex;
    use std::sync::Arc;

    /// Data source stub returning fixed counts and recording filter calls
    #[derive(Clone, Default)]
    struct StubSource {
        field: String,
        counts: CountMapping,
        filter: Option<ViewFilter>,
        applied: Arc<Mutex<Vec<ViewFilter>>>,
    }

    impl StubSource {
        fn new(field: &str, pairs: &[(&str, u64)]) -> Self {
            Self {
                field: field.to_string(),
                counts: pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
                ..Self::default()
            }
        }
    }

    impl DataSource for StubSource {
        fn source_name(&self) -> &str {
            "stub"
        }

        fn len(&self) -> usize {
            self.counts.values().sum::<u64>() as usize
        }

        fn has_field(&self, field: &str) -> bool {
            field == self.field
        }

        fn countable_fields(&self) -> Vec<String> {
            vec![self.field.clone()]
        }

        fn count_values(&self, field: &str) -> Result<CountMapping, QueryError> {
            if !self.has_field(field) {
                return Err(QueryError::invalid_field(field));
            }
            Ok(self.counts.clone())
        }

        fn active_filter(&self) -> Option<&ViewFilter> {
            self.filter.as_ref()
        }

        fn apply_filter(&self, filter: &ViewFilter) -> Result<Box<dyn DataSource>, QueryError> {
            self.applied.lock().push(filter.clone());
            Ok(Box::new(StubSource {
                filter: Some(filter.clone()),
                ..self.clone()
            }))
        }

        fn clear_filter(&self) -> Box<dyn DataSource> {
            Box::new(StubSource {
                filter: None,
                ..self.clone()
            })
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    #[test]
    fn test_load_resolves_default_field() {
        let source = StubSource::new(DEFAULT_TARGET_FIELD, &[("dog", 1), ("cat", 3)]);
        let mut controller = HistogramController::default();

        let chart = controller.load(&source, None).unwrap();
        assert_eq!(chart.field, DEFAULT_TARGET_FIELD);
        assert_eq!(chart.keys(), ["cat", "dog"]);
        assert_eq!(chart.series[0].values, vec![3, 1]);
        assert_eq!(controller.target_field(), Some(DEFAULT_TARGET_FIELD));
        assert_eq!(
            controller.field_kind(),
            Some(&FieldKind::LabelPath { root: "ground_truth".to_string() })
        );
    }

    #[test]
    fn test_override_then_stored_field() {
        let source = StubSource::new("tags", &[("train", 5)]);
        let mut controller = HistogramController::default();

        let loaded = controller.load(&source, Some("tags")).unwrap().clone();
        let changed = controller.on_data_source_changed(&source).unwrap().clone();
        assert_eq!(changed, loaded);
        assert_eq!(changed.field, "tags");
    }

    #[test]
    fn test_invalid_field_leaves_state_untouched() {
        let source = StubSource::new("tags", &[("train", 5)]);
        let mut controller = HistogramController::default();
        controller.load(&source, Some("tags")).unwrap();
        let before = controller.chart().cloned();

        let err = controller.load(&source, Some("weather")).unwrap_err();
        assert_eq!(err, QueryError::invalid_field("weather"));
        assert_eq!(controller.target_field(), Some("tags"));
        assert_eq!(controller.chart().cloned(), before);
    }

    #[test]
    fn test_invalid_default_field_commits_nothing() {
        let source = StubSource::new("size", &[("small", 4)]);
        let mut controller = HistogramController::default();

        assert!(controller.load(&source, None).is_err());
        assert_eq!(controller.target_field(), None);
        assert!(controller.chart().is_none());
    }

    #[test]
    fn test_select_bar_without_field_is_noop() {
        let source = StubSource::new("size", &[("small", 4)]);
        let mut controller = HistogramController::default();

        assert!(controller.select_bar(&source, "small").unwrap().is_none());
        assert!(source.applied.lock().is_empty());
        assert_eq!(controller.state(), &FilterState::Unfiltered);
    }

    #[test]
    fn test_select_bar_scalar_field() {
        let source = StubSource::new("size", &[("small", 4)]);
        let mut controller = HistogramController::default();
        controller.load(&source, Some("size")).unwrap();

        let view = controller.select_bar(&source, "small").unwrap().unwrap();
        let expected = ViewFilter::field_equals("size", "small").unwrap();
        assert_eq!(view.active_filter(), Some(&expected));
        assert_eq!(controller.state(), &FilterState::Filtered(expected));
    }

    #[test]
    fn test_failed_filter_construction_applies_nothing() {
        let source = StubSource::new(".label", &[("cat", 1)]);
        let mut controller = HistogramController::default();
        controller.load(&source, Some(".label")).unwrap();

        let Err(err) = controller.select_bar(&source, "cat") else {
            panic!("selecting a bar of '.label' should fail");
        };
        assert!(matches!(err, QueryError::InvalidFilter { .. }));
        assert!(source.applied.lock().is_empty());
        assert_eq!(controller.state(), &FilterState::Unfiltered);
    }

    #[test]
    fn test_reset_clears_filter_and_reloads() {
        let source = StubSource::new("tags", &[("train", 5), ("test", 2)]);
        let mut controller = HistogramController::default();
        controller.load(&source, Some("tags")).unwrap();

        let filtered = controller.select_bar(&source, "test").unwrap().unwrap();
        let first = controller.reset(filtered.as_ref()).unwrap();
        let first_chart = controller.chart().cloned();
        let second = controller.reset(first.as_ref()).unwrap();

        assert!(first.active_filter().is_none());
        assert!(second.active_filter().is_none());
        assert_eq!(controller.chart().cloned(), first_chart);
        assert_eq!(controller.state(), &FilterState::Unfiltered);
    }

    #[test]
    fn test_restore_target_field() {
        let source = StubSource::new("size", &[("small", 4)]);
        let mut controller = HistogramController::default();
        controller.restore_target_field("size");

        assert_eq!(controller.resolve_field(None), "size");
        assert_eq!(controller.load(&source, None).unwrap().keys(), ["small"]);
    }

    #[test]
    fn test_blank_saved_field_falls_back_to_default() {
        let source = StubSource::new(DEFAULT_TARGET_FIELD, &[("cat", 3)]);
        let mut controller = HistogramController::default();
        controller.restore_target_field("");
        controller.restore_target_field("   ");

        assert_eq!(controller.target_field(), None);
        assert_eq!(controller.resolve_field(None), DEFAULT_TARGET_FIELD);
        assert_eq!(controller.resolve_field(Some("")), DEFAULT_TARGET_FIELD);
        assert_eq!(controller.load(&source, None).unwrap().field, DEFAULT_TARGET_FIELD);
    }

    #[test]
    fn test_blank_saved_field_keeps_previous_field() {
        let mut controller = HistogramController::default();
        controller.restore_target_field("size");
        controller.restore_target_field("");

        assert_eq!(controller.resolve_field(None), "size");
    }

    #[test]
    fn test_select_bar_with_blank_saved_field_is_noop() {
        let source = StubSource::new(DEFAULT_TARGET_FIELD, &[("cat", 3)]);
        let mut controller = HistogramController::default();
        controller.restore_target_field("");

        assert!(controller.select_bar(&source, "cat").unwrap().is_none());
        assert!(source.applied.lock().is_empty());
        assert_eq!(controller.state(), &FilterState::Unfiltered);
    }
}
