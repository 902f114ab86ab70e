//! Source adapters and loading entrypoints.
//!
//! Most callers should use [`load_from_path`] (from [`unified`]) which:
//!
//! - detects the format by file extension (or you can force one via [`LoadOptions`])
//! - loads the file into an in-memory [`crate::types::NormalizedTable`]
//! - optionally reports success/failure/alerts to a [`crate::observability::PipelineObserver`]
//!
//! Format-specific functions are also available under:
//! - [`csv`]
//! - [`json`]
//! - [`xml`]
//!
//! [`discovery::expand_inputs`] turns directories and glob patterns into source paths.

pub mod csv;
pub mod discovery;
pub mod json;
pub mod unified;
pub mod xml;

pub use discovery::expand_inputs;
pub use unified::{load_from_path, LoadOptions, SourceFormat};
