//! Plot panel implementations

pub mod stacked_histogram;

// Re-exports
pub use stacked_histogram::{StackedHistogramPanel, PANEL_LABEL, PANEL_NAME, RESET_ACTION};
