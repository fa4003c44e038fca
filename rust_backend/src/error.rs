//! Error types for the analytics pipeline.
//!
//! Schema and record errors surface immediately with the offending field or
//! row. Per-room forecasting problems are never raised through this type; they
//! are collected as [`crate::forecasting::SkipReason`]s in the forecast report.

use polars::prelude::PolarsError;
use thiserror::Error;

/// Result type for analytics operations
pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

/// Errors that can occur while loading, normalizing or analysing occupancy data
#[derive(Error, Debug)]
pub enum AnalyticsError {
    /// A required logical field has no matching column in the input table.
    #[error("Schema error: missing required field '{field}' (expected column '{column}')")]
    SchemaError { field: &'static str, column: String },

    /// Time-slot text could not be mapped to an hour of day.
    #[error("Malformed time slot at row {row}: '{value}'")]
    MalformedTimeSlot { row: usize, value: String },

    /// Day name outside Monday..Friday.
    #[error("Unknown day at row {row}: '{value}'")]
    UnknownDay { row: usize, value: String },

    /// Raw occupancy indicator is neither an occupied nor an empty marker.
    #[error("Malformed occupancy indicator at row {row}: '{value}'")]
    MalformedOccupancy { row: usize, value: String },

    /// Row has no room identifier.
    #[error("Missing room identifier at row {row}")]
    MissingRoom { row: usize },

    /// Configuration values are out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// I/O error (file operations)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Polars failed to read, cast or write a table
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML configuration could not be parsed
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// The async runtime used for forecasting could not be created
    #[error("Runtime error: {0}")]
    Runtime(String),
}

impl AnalyticsError {
    /// Returns `true` for errors that concern a single input record.
    ///
    /// These are the errors that lenient normalization drops and reports
    /// instead of failing the batch.
    pub fn is_record_error(&self) -> bool {
        matches!(
            self,
            AnalyticsError::MalformedTimeSlot { .. }
                | AnalyticsError::UnknownDay { .. }
                | AnalyticsError::MalformedOccupancy { .. }
                | AnalyticsError::MissingRoom { .. }
        )
    }

    /// Row index of the offending record, if the error concerns one.
    pub fn row(&self) -> Option<usize> {
        match self {
            AnalyticsError::MalformedTimeSlot { row, .. }
            | AnalyticsError::UnknownDay { row, .. }
            | AnalyticsError::MalformedOccupancy { row, .. }
            | AnalyticsError::MissingRoom { row } => Some(*row),
            _ => None,
        }
    }

    /// Short machine-readable name of the error kind, used in run reports.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyticsError::SchemaError { .. } => "SchemaError",
            AnalyticsError::MalformedTimeSlot { .. } => "MalformedTimeSlot",
            AnalyticsError::UnknownDay { .. } => "UnknownDay",
            AnalyticsError::MalformedOccupancy { .. } => "MalformedOccupancy",
            AnalyticsError::MissingRoom { .. } => "MissingRoom",
            AnalyticsError::InvalidConfig(_) => "InvalidConfig",
            AnalyticsError::Io(_) => "Io",
            AnalyticsError::Polars(_) => "Polars",
            AnalyticsError::Json(_) => "Json",
            AnalyticsError::Toml(_) => "Toml",
            AnalyticsError::Runtime(_) => "Runtime",
        }
    }
}
