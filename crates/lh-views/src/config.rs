//! Histogram panel configuration

use serde::{Deserialize, Serialize};

use crate::chart::{PlotLayout, SecondarySeries};

/// Field grouped by when neither the caller nor saved state names one
pub const DEFAULT_TARGET_FIELD: &str = "ground_truth.detections.label";

/// Panel opened next to the histogram after each load
pub const DEFAULT_COMPANION_PANEL: &str = "example_interactive_plot";

/// Histogram panel configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistogramConfig {
    /// Field to group by when none has been chosen
    pub default_field: String,

    /// Whether to draw the doubled companion series
    pub secondary_series: SecondarySeries,

    /// Static plot layout
    pub layout: PlotLayout,

    /// Bar width factor (0.0 to 1.0)
    pub bar_width: f32,

    /// Panel the host is asked to open beside this one
    pub companion_panel: String,
}

impl Default for HistogramConfig {
    fn default() -> Self {
        Self {
            default_field: DEFAULT_TARGET_FIELD.to_string(),
            secondary_series: SecondarySeries::default(),
            layout: PlotLayout::default(),
            bar_width: 0.7,
            companion_panel: DEFAULT_COMPANION_PANEL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: HistogramConfig =
            serde_json::from_str(r#"{"secondary_series": "off", "layout": {"title": "Labels"}}"#).unwrap();

        assert_eq!(config.default_field, DEFAULT_TARGET_FIELD);
        assert_eq!(config.secondary_series, SecondarySeries::Off);
        assert_eq!(config.layout.title, "Labels");
        assert_eq!(config.layout.y_label, "Count");
    }
}
