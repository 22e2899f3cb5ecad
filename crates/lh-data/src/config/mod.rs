//! Dataset loading configuration

pub mod dataset_config;
pub mod null_handling;

pub use dataset_config::*;
pub use null_handling::*;
