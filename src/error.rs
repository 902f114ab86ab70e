use std::path::PathBuf;

use thiserror::Error;

/// Convenience result type used across loading, reconciliation and output.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Error type returned by every fallible operation in the crate.
///
/// Source-level variants (`Io`, `Csv`, `Json`, `Xml`, `SourceFormat`, `UnsupportedFormat`,
/// `EmptyTable`, `RaggedTable`) cause a single source to be skipped by
/// [`crate::pipeline::load_all`]. Everything else aborts the run.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Underlying I/O error (e.g. file not found, permission denied).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV read/write error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON syntax error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// XML syntax error.
    #[error("xml error: {0}")]
    Xml(#[from] xml::reader::Error),

    /// The document parsed, but does not have the shape the adapter expects.
    #[error("unexpected source layout: {message}")]
    SourceFormat { message: String },

    /// The file extension does not map to a known source format.
    #[error("unsupported format for '{}' (expected .json, .xml or .csv)", .path.display())]
    UnsupportedFormat { path: PathBuf },

    /// A table has no columns, so its row count cannot be determined.
    #[error("table from '{source_name}' has no columns")]
    EmptyTable { source_name: String },

    /// Columns of one table disagree on their length.
    #[error("column '{column}' has {found} values, expected {expected}")]
    RaggedTable {
        column: String,
        expected: usize,
        found: usize,
    },

    /// A column name is not `<prefix><non-negative integer>`.
    #[error("malformed column name '{name}'")]
    MalformedColumnName { name: String },

    /// The requested sort column is not part of the unified schema.
    #[error("cannot order by unknown column '{column}'")]
    UnknownOrderColumn { column: String },

    /// A data row's width disagrees with the header.
    #[error("row {row} has {found} cells, header has {expected}")]
    HeterogeneousRowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A dimension column appears after a measure column in a header.
    #[error("dimension column '{column}' follows a measure column")]
    DimensionAfterMeasure { column: String },

    /// A measure value could not be coerced to an integer.
    #[error("non-numeric value in measure column '{column}' at row {row} (raw='{raw}')")]
    NonNumericMeasure {
        column: String,
        row: usize,
        raw: String,
    },

    /// Summing a measure column overflowed `i64`.
    #[error("sum of measure column '{column}' overflows i64")]
    MeasureOverflow { column: String },

    /// An input glob pattern could not be parsed.
    #[error("invalid input pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// No source could be loaded.
    #[error("no source could be loaded")]
    NoSources,
}
