//! Core abstractions for the label histogram panel
//!
//! This crate defines the narrow contract between a panel and the data it
//! aggregates: the [`DataSource`] trait, the filter predicates a panel can
//! derive from a chart click, and the event bus used to tell the host what
//! happened.

pub mod data;
pub mod error;
pub mod events;
pub mod filter;

// Re-export commonly used types
pub use data::{CountMapping, DataSource};
pub use error::QueryError;
pub use events::{EventBus, Event, EventHandler, handler_from_fn};
pub use filter::ViewFilter;
