//! Error types for the insight engine and its collaborators.
//!
//! Only two variants are raised by the analysis core itself: [`InsightError::NoColumns`]
//! and [`InsightError::EmptyTable`]. Every numeric degradation inside the engine is
//! recovered locally and never surfaces here. The remaining variants belong to table
//! construction, loading, and report persistence.
//!
//! Errors serialize as `{ code, message }` so a transport layer can forward them
//! to a client unchanged.

use crate::config::ConfigValidationError;
use serde::Serialize;
use serde::ser::SerializeStruct;
use thiserror::Error;

/// The main error type for table construction, analysis, loading and storage.
#[derive(Error, Debug)]
pub enum InsightError {
    /// The table has no columns.
    #[error("Table has no columns")]
    NoColumns,

    /// The table has columns but zero rows.
    #[error("Table is empty")]
    EmptyTable,

    /// A column's length disagrees with the rest of the table.
    #[error("Column '{column}' has {actual} values, expected {expected}")]
    RaggedColumns {
        column: String,
        expected: usize,
        actual: usize,
    },

    /// Two columns share a name.
    #[error("Duplicate column name '{0}'")]
    DuplicateColumn(String),

    /// Column was not found in the table.
    #[error("Column '{0}' not found in table")]
    ColumnNotFound(String),

    /// Invalid configuration provided.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The input file is not a format the loader understands.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// A report store was used after `close()`.
    #[error("Report store is closed")]
    StoreClosed,

    /// No stored report exists under the given identifier.
    #[error("Report '{0}' not found")]
    ReportNotFound(String),

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars error wrapper.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context.
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<InsightError>,
    },
}

impl InsightError {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        InsightError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// Get error code for client handling.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NoColumns => "NO_COLUMNS",
            Self::EmptyTable => "EMPTY_TABLE",
            Self::RaggedColumns { .. } => "RAGGED_COLUMNS",
            Self::DuplicateColumn(_) => "DUPLICATE_COLUMN",
            Self::ColumnNotFound(_) => "COLUMN_NOT_FOUND",
            Self::InvalidConfig(_) => "INVALID_CONFIG",
            Self::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            Self::StoreClosed => "STORE_CLOSED",
            Self::ReportNotFound(_) => "REPORT_NOT_FOUND",
            Self::Io(_) => "IO_ERROR",
            Self::Polars(_) => "POLARS_ERROR",
            Self::Json(_) => "JSON_ERROR",
            Self::WithContext { source, .. } => source.error_code(),
        }
    }

    /// Check if this error rejects the input table's shape.
    ///
    /// A transport layer maps these to a client error (the upload itself is
    /// unusable) rather than a server failure.
    pub fn is_input_rejection(&self) -> bool {
        match self {
            Self::NoColumns | Self::EmptyTable => true,
            Self::WithContext { source, .. } => source.is_input_rejection(),
            _ => false,
        }
    }
}

impl From<ConfigValidationError> for InsightError {
    fn from(err: ConfigValidationError) -> Self {
        InsightError::InvalidConfig(err.to_string())
    }
}

impl Serialize for InsightError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut state = serializer.serialize_struct("InsightError", 2)?;
        state.serialize_field("code", &self.error_code())?;
        state.serialize_field("message", &self.to_string())?;
        state.end()
    }
}

/// Result type alias for insight operations.
pub type Result<T> = std::result::Result<T, InsightError>;

/// Extension trait for adding context to Results.
pub trait ResultExt<T> {
    /// Add context to an error result.
    fn context(self, context: impl Into<String>) -> Result<T>;
}

impl<T> ResultExt<T> for Result<T> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, polars::error::PolarsError> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| InsightError::Polars(e).with_context(context))
    }
}

impl<T> ResultExt<T> for std::result::Result<T, std::io::Error> {
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| InsightError::Io(e).with_context(context))
    }
}
