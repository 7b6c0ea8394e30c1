use serde::Serialize;
use thiserror::Error;

/// Errors raised by the chart pipelines. Each one aborts the chart it
/// belongs to and nothing else.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    #[error("row {row}: field '{field}' has value '{value}', which is not a finite number")]
    MalformedRecord {
        row: usize,
        field: String,
        value: String,
    },

    #[error("row {row}: missing required field '{field}'")]
    MissingField { row: usize, field: String },

    #[error("column '{column}' not found. Available columns: {available}")]
    ColumnNotFound { column: String, available: String },

    #[error("cannot summarize empty group {}", .key.as_deref().unwrap_or("<unnamed>"))]
    EmptyGroup { key: Option<String> },

    #[error("dataset contains no usable records")]
    EmptyDataset,

    #[error("key '{key}' is not in the domain of the {scale} scale")]
    UnknownKey { key: String, scale: &'static str },
}

/// Conditions worth reporting that do not stop a chart from being built.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartWarning {
    #[error("{keys} categories share a palette of {colors} colors; colors repeat")]
    PaletteExhausted { keys: usize, colors: usize },

    #[error("skipped row {row}: {reason}")]
    SkippedRow { row: usize, reason: String },
}
