//! Error types for the analysis pipeline.

use thiserror::Error;

/// Domain failures that callers branch on. Everything else travels as `anyhow::Error`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Count for {condition} is {found}, expected {expected}; check inputs and data sheets again")]
    ReplicateCountMismatch {
        condition: String,
        expected: usize,
        found: usize,
    },

    #[error("Workbook has no sheet named '{0}'")]
    MissingSheet(String),

    #[error("Sheet '{0}' has no header row")]
    EmptySheet(String),

    #[error("Invalid measurement '{value}' at row {row}, column {column}")]
    InvalidMeasurement {
        value: String,
        row: usize,
        column: usize,
    },

    #[error("Tab for {numerator} would clash with the tab for {existing}")]
    DuplicateTab { numerator: String, existing: String },

    #[error("'{0}' cannot be used as a worksheet name")]
    InvalidTabName(String),

    #[error("Expected {expected} measurement columns, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },
}
