//! Chart data produced from a count mapping

use lh_core::CountMapping;
use serde::{Deserialize, Serialize};

/// Whether a second series with doubled values is drawn on top of the counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SecondarySeries {
    /// Stack a copy of the counts scaled by two
    #[default]
    Doubled,
    /// Counts only
    Off,
}

/// How series sharing an x position are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    #[default]
    Stack,
    Group,
}

/// Static layout metadata handed to the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotLayout {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub bar_mode: BarMode,
}

impl Default for PlotLayout {
    fn default() -> Self {
        Self {
            title: "Interactive Histogram Stacked".to_string(),
            x_label: "Labels".to_string(),
            y_label: "Count".to_string(),
            bar_mode: BarMode::Stack,
        }
    }
}

/// One bar series: parallel keys and values, keys ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub name: String,
    pub keys: Vec<String>,
    pub values: Vec<u64>,
}

/// Everything the renderer needs for one histogram
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartData {
    /// Field the counts were computed over
    pub field: String,
    /// Primary series first
    pub series: Vec<ChartSeries>,
}

impl ChartData {
    /// Build chart data from counts, sorting by key
    pub fn from_counts(field: &str, counts: &CountMapping, secondary: SecondarySeries) -> Self {
        let (keys, values) = sorted_counts(counts);

        let mut series = Vec::with_capacity(2);
        if secondary == SecondarySeries::Doubled {
            let doubled = values.iter().map(|v| v.saturating_mul(2)).collect();
            series.push(ChartSeries {
                name: "count".to_string(),
                keys: keys.clone(),
                values,
            });
            series.push(ChartSeries {
                name: "count x2".to_string(),
                keys,
                values: doubled,
            });
        } else {
            series.push(ChartSeries {
                name: "count".to_string(),
                keys,
                values,
            });
        }

        Self {
            field: field.to_string(),
            series,
        }
    }

    /// The primary series
    pub fn primary(&self) -> Option<&ChartSeries> {
        self.series.first()
    }

    /// Bucket keys, in display order
    pub fn keys(&self) -> &[String] {
        self.primary().map(|s| s.keys.as_slice()).unwrap_or(&[])
    }

    /// Key of the bar at `index`
    pub fn key_at(&self, index: usize) -> Option<&str> {
        self.keys().get(index).map(String::as_str)
    }

    /// Number of buckets
    pub fn len(&self) -> usize {
        self.keys().len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys().is_empty()
    }

    /// Sum of the primary series
    pub fn total(&self) -> u64 {
        self.primary().map(|s| s.values.iter().sum()).unwrap_or(0)
    }
}

/// Split counts into key and value sequences sorted by key
pub fn sorted_counts(counts: &CountMapping) -> (Vec<String>, Vec<u64>) {
    let mut pairs: Vec<(&String, &u64)> = counts.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));
    pairs.into_iter().map(|(k, v)| (k.clone(), *v)).unzip()
}

/// Index of the bar under plot x coordinate `x`, if any.
///
/// Bars sit at integer positions `0..bar_count` and extend `bar_width / 2`
/// either side.
pub fn bar_index_at(x: f64, bar_count: usize, bar_width: f64) -> Option<usize> {
    let nearest = x.round();
    if nearest < 0.0 || nearest >= bar_count as f64 {
        return None;
    }
    ((x - nearest).abs() <= bar_width / 2.0).then_some(nearest as usize)
}
