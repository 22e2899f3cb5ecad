//! In-memory sample datasets and loaders for the label histogram panel

pub mod config;
pub mod dataset;
pub mod path;
pub mod schema;
pub mod sources;
pub mod view;

use lh_core::QueryError;
use thiserror::Error;

// Re-exports
pub use config::{DataFormat, DatasetConfig};
pub use dataset::Dataset;
pub use schema::{FieldSchema, FieldType};
pub use sources::load_dataset;
pub use view::SampleView;

/// Errors that can occur while building or loading a dataset
#[derive(Error, Debug)]
pub enum DataError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV parsing error: {0}")]
    Csv(String),

    #[error("Invalid sample at index {index}: {reason}")]
    InvalidSample { index: usize, reason: String },

    #[error("Unsupported data format: {0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Query(#[from] QueryError),
}

impl From<csv::Error> for DataError {
    fn from(error: csv::Error) -> Self {
        match error.kind() {
            csv::ErrorKind::Io(io_err) => DataError::Io(std::io::Error::new(io_err.kind(), error.to_string())),
            _ => DataError::Csv(error.to_string()),
        }
    }
}
