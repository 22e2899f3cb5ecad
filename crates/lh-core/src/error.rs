use thiserror::Error;

/// Errors raised by a data source while answering a query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    #[error("Field '{field}' does not exist on the data source")]
    InvalidField { field: String },

    #[error("Cannot build filter: {reason}")]
    InvalidFilter { reason: String },
}

impl QueryError {
    pub fn invalid_field(field: impl Into<String>) -> Self {
        QueryError::InvalidField { field: field.into() }
    }

    pub fn invalid_filter(reason: impl Into<String>) -> Self {
        QueryError::InvalidFilter { reason: reason.into() }
    }
}
