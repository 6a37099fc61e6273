//! Core error types for Datagrid RS
//!
//! Local edit mistakes (empty values, bad indices, unknown fields) never
//! surface here; they are no-ops. Only failures that cross a boundary do.

use thiserror::Error;

/// Failure reported by a data source adapter
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataSourceError {
    #[error("Data source unavailable: {0}")]
    Unavailable(String),

    #[error("Data source rejected query: {0}")]
    Rejected(String),

    #[error("Data source error: {0}")]
    Other(String),
}

impl DataSourceError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected(message.into())
    }
}

/// Core error type for grid operations
#[derive(Error, Debug)]
pub enum GridError {
    #[error("Fetch failed for request #{sequence}: {source}")]
    DataSource {
        sequence: u64,
        #[source]
        source: DataSourceError,
    },
}

impl GridError {
    pub fn error_code(&self) -> &'static str {
        match self {
            GridError::DataSource { .. } => "data_source_error",
        }
    }
}

/// Standard Result type for grid operations
pub type GridResult<T> = Result<T, GridError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_source_error_display() {
        let err = DataSourceError::unavailable("connection refused");
        assert_eq!(err.to_string(), "Data source unavailable: connection refused");
    }

    #[test]
    fn test_grid_error_codes() {
        let err = GridError::DataSource {
            sequence: 3,
            source: DataSourceError::rejected("bad filter"),
        };
        assert_eq!(err.error_code(), "data_source_error");
        assert!(err.to_string().contains("#3"));
    }
}
