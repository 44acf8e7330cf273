//! Error Module
//! One error type for table construction, loading, series building and rendering.

use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChartError {
    /// The table cannot supply both an axis column and a value column.
    #[error("at least 2 data columns are required, found {columns}")]
    InsufficientData { columns: usize },
    #[error("a table needs at least one column")]
    NoColumns,
    #[error("row {row} has {found} cells but the table has {expected} columns")]
    RowTooWide {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("Failed to load CSV: {0}")]
    Load(#[from] PolarsError),
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Render error: {0}")]
    Render(String),
}

pub type Result<T, E = ChartError> = std::result::Result<T, E>;
