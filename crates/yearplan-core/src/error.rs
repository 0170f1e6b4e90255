//! Error types for the year plan core.

use thiserror::Error;
use yearplan_model::{ColumnId, RowId};

/// Errors that can occur while editing the year plan grid
#[derive(Error, Debug)]
pub enum YearPlanError {
    #[error("Column name must not be empty")]
    EmptyColumnName,

    #[error("Add a column before adding rows")]
    NoColumns,

    #[error("Unknown column: {0}")]
    UnknownColumn(ColumnId),

    #[error("Unknown row: {0}")]
    UnknownRow(RowId),

    #[error("Still adding a {0}; wait for it to finish")]
    AddInFlight(&'static str),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Backend unavailable: {0}")]
    Unavailable(String),
}

impl YearPlanError {
    /// Client-side validation failures, caught before anything is dispatched.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            YearPlanError::EmptyColumnName
                | YearPlanError::NoColumns
                | YearPlanError::UnknownColumn(_)
                | YearPlanError::UnknownRow(_)
                | YearPlanError::AddInFlight(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, YearPlanError>;
