//! `table-reconcile` merges small tabular exports in different serializations (XML, JSON,
//! CSV) into one unified schema and derives two tables from them:
//!
//! - **basic**: every source row, back-filled to the unified schema and sorted by a key
//!   column
//! - **advanced**: one row per distinct combination of dimension values, with measure
//!   columns summed
//!
//! ## Column convention
//!
//! Column names are `<prefix><index>` (`D1`, `M3`, ...). Columns whose prefix is `D` are
//! *dimensions* (opaque strings, used as grouping keys); every other prefix marks a
//! *measure* (integers, summed). When a source lacks a column, its rows are back-filled with
//! `""` (dimensions) or `0` (measures).
//!
//! ## Quick example
//!
//! ```no_run
//! use table_reconcile::pipeline::{run_to_files, OutputPaths, PipelineOptions};
//!
//! # fn main() -> Result<(), table_reconcile::ReconcileError> {
//! let sources = ["xml_data.xml", "json_data.json", "csv_data_1.csv"];
//! let out = run_to_files(&sources, &PipelineOptions::default(), &OutputPaths::default())?;
//! println!(
//!     "loaded={} skipped={} groups={}",
//!     out.loaded,
//!     out.skipped.len(),
//!     out.reconciled.advanced.row_count()
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`ingestion`]: source adapters, format detection and input discovery
//! - [`processing`]: schema unification, merge, row composition and grouping
//! - [`pipeline`]: load-all / reconcile / write orchestration
//! - [`output`]: TSV sinks
//! - [`observability`]: diagnostics observers
//! - [`types`]: tables, column names and values
//! - [`error`]: the crate-wide error type

pub mod error;
pub mod ingestion;
pub mod observability;
pub mod output;
pub mod pipeline;
pub mod processing;
pub mod types;

pub use error::{ReconcileError, ReconcileResult};
