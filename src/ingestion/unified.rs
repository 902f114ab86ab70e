//! Unified loading entrypoint.
//!
//! Most callers should use [`load_from_path`], which loads one file into a
//! [`crate::types::NormalizedTable`].
//!
//! - If [`LoadOptions::format`] is `None`, the format is inferred from the file extension.
//! - If an [`crate::observability::PipelineObserver`] is configured, the outcome is reported
//!   to it.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::error::{ReconcileError, ReconcileResult};
use crate::observability::{LoadStats, PipelineObserver, Severity, SourceContext};
use crate::types::NormalizedTable;

use super::{csv, json, xml};

/// Supported source formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values, first record = column names.
    Csv,
    /// Object with a `fields` array of flat records.
    Json,
    /// Container element of named column elements.
    Xml,
}

impl SourceFormat {
    /// Parse a source format from a file extension (case-insensitive).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "csv" => Some(Self::Csv),
            "json" => Some(Self::Json),
            "xml" => Some(Self::Xml),
            _ => None,
        }
    }

    /// Infer the format of `path` from its extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|s| s.to_str())
            .and_then(Self::from_extension)
    }
}

/// Options controlling source loading.
///
/// Use [`Default`] for common cases.
#[derive(Clone)]
pub struct LoadOptions {
    /// If `None`, infer the format from the file extension.
    pub format: Option<SourceFormat>,
    /// Optional observer for diagnostics/alerts.
    pub observer: Option<Arc<dyn PipelineObserver>>,
    /// Severity threshold at which `on_alert` is invoked.
    pub alert_at_or_above: Severity,
}

impl fmt::Debug for LoadOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadOptions")
            .field("format", &self.format)
            .field("observer_set", &self.observer.is_some())
            .field("alert_at_or_above", &self.alert_at_or_above)
            .finish()
    }
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            format: None,
            observer: None,
            alert_at_or_above: Severity::Critical,
        }
    }
}

/// Load one source file into a [`NormalizedTable`].
///
/// The returned table is labelled with the path and always has at least one column; a source
/// without columns is [`ReconcileError::EmptyTable`].
///
/// When an observer is configured, this function reports:
///
/// - `on_source_loaded` on success, with column/row counts
/// - `on_source_skipped` on failure, with a computed severity
/// - `on_alert` on failure when the severity is >= `options.alert_at_or_above`
///
/// ```no_run
/// use table_reconcile::ingestion::{load_from_path, LoadOptions};
///
/// # fn main() -> Result<(), table_reconcile::ReconcileError> {
/// let table = load_from_path("csv_data_1.csv", &LoadOptions::default())?;
/// println!("columns={}", table.column_count());
/// # Ok(())
/// # }
/// ```
pub fn load_from_path(
    path: impl AsRef<Path>,
    options: &LoadOptions,
) -> ReconcileResult<NormalizedTable> {
    let path = path.as_ref();
    let format = options.format.or_else(|| SourceFormat::from_path(path));
    let ctx = SourceContext {
        path: path.to_path_buf(),
        format,
    };

    let result = match format {
        Some(f) => load_with_format(path, f),
        None => Err(ReconcileError::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    };

    if let Some(obs) = options.observer.as_ref() {
        match &result {
            Ok(table) => obs.on_source_loaded(
                &ctx,
                LoadStats {
                    columns: table.column_count(),
                    rows: table.row_count().unwrap_or(0),
                },
            ),
            Err(e) => {
                let sev = Severity::for_load_error(e);
                obs.on_source_skipped(&ctx, sev, e);
                if sev >= options.alert_at_or_above {
                    obs.on_alert(&ctx, sev, e);
                }
            }
        }
    }

    result
}

fn load_with_format(path: &Path, format: SourceFormat) -> ReconcileResult<NormalizedTable> {
    let table = match format {
        SourceFormat::Csv => csv::load_csv_from_path(path)?,
        SourceFormat::Json => json::load_json_from_path(path)?,
        SourceFormat::Xml => xml::load_xml_from_path(path)?,
    };
    let label = path.display().to_string();
    if table.row_count().is_none() {
        return Err(ReconcileError::EmptyTable { source_name: label });
    }
    Ok(table.with_source(label))
}
