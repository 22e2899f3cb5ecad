//! Panel system for the label histogram
//!
//! The [`HistogramController`] holds the behavior (field selection, counts,
//! click-to-filter, reset) and is host agnostic. [`StackedHistogramPanel`]
//! wires it to the [`Panel`] lifecycle and draws it with egui.

pub mod chart;
pub mod config;
pub mod controller;
pub mod field;
mod panel;
pub mod plots;

pub use chart::{BarMode, ChartData, ChartSeries, PlotLayout, SecondarySeries};
pub use config::{HistogramConfig, DEFAULT_COMPANION_PANEL, DEFAULT_TARGET_FIELD};
pub use controller::{FilterState, HistogramController};
pub use field::{FieldKind, TargetField};
pub use panel::{
    HostOps, Panel, PanelConfig, PanelContext, PanelError, PanelId, SharedViewHost, SplitLayout, ViewSlot,
};
pub use plots::{StackedHistogramPanel, PANEL_LABEL, PANEL_NAME, RESET_ACTION};
