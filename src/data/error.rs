use std::path::PathBuf;

use arrow::error::ArrowError;
use thiserror::Error;

/// Raised when no candidate encoding yields a parseable table.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("could not parse CSV under any candidate encoding ({causes})")]
    Unparseable { causes: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to build table: {0}")]
    Engine(#[from] ArrowError),
}

/// Raised by the predicate filter engine.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("operand '{0}' is not a number")]
    InvalidOperand(String),

    #[error("unknown operator: {0}")]
    UnknownOperator(String),

    #[error("failed to apply selection mask: {0}")]
    Engine(#[from] ArrowError),
}

/// Raised by column selection.
#[derive(Debug, Error)]
pub enum SelectError {
    #[error("select at least one column")]
    NoColumns,

    #[error("column not found: {0}")]
    ColumnNotFound(String),

    #[error("failed to project columns: {0}")]
    Engine(#[from] ArrowError),
}

/// Raised by the table concatenator.
#[derive(Debug, Error)]
pub enum ConcatError {
    #[error("nothing to concatenate: no input tables")]
    Empty,

    #[error("failed to stack tables: {0}")]
    Engine(#[from] ArrowError),
}

/// Raised while serializing a table to CSV.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
