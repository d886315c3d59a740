//! Error taxonomy for the analysis pipeline

use chrono::NaiveDate;
use thiserror::Error;

/// Conditions that stop a pipeline run.
///
/// Every variant is a precondition or data problem; none is transient, so
/// there is no retry path. Callers surface the message and abort the run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Requested range has its start after its end.
    #[error("invalid date range: start {start} is after end {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },

    /// Requested range falls outside the span of the loaded daily table.
    #[error("date range {start}..{end} is outside the loaded span {min}..{max}")]
    OutOfBounds {
        start: NaiveDate,
        end: NaiveDate,
        min: NaiveDate,
        max: NaiveDate,
    },

    /// Filtered data is too small or degenerate for the requested analysis.
    #[error("insufficient data: {reason}")]
    InsufficientData { reason: String },

    /// A required column is absent from a loaded table.
    #[error("column '{name}' not found in the {table} table")]
    MissingColumn { table: String, name: String },
}

impl PipelineError {
    pub fn insufficient(reason: impl Into<String>) -> Self {
        PipelineError::InsufficientData {
            reason: reason.into(),
        }
    }

    pub fn missing_column(table: &str, name: &str) -> Self {
        PipelineError::MissingColumn {
            table: table.to_string(),
            name: name.to_string(),
        }
    }
}
