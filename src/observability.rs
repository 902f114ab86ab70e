//! Diagnostics channel for pipeline runs.
//!
//! Core processing functions are pure. Everything worth telling an operator (a source was
//! loaded or skipped, a stage finished) is reported to a [`PipelineObserver`] passed in
//! explicitly through [`crate::pipeline::PipelineOptions`].

use std::error::Error as StdError;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::ReconcileError;
use crate::ingestion::SourceFormat;

/// Severity classification used for observer callbacks and alerting thresholds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational event.
    Info,
    /// Warning-level event (non-fatal, e.g. an unsupported file was skipped).
    Warning,
    /// Error-level event (a source could not be loaded).
    Error,
    /// Critical error (typically I/O failures).
    Critical,
}

impl Severity {
    /// Severity of a source load failure.
    pub fn for_load_error(e: &ReconcileError) -> Self {
        match e {
            ReconcileError::Io(_) => Severity::Critical,
            ReconcileError::Csv(err) => match err.kind() {
                ::csv::ErrorKind::Io(_) => Severity::Critical,
                _ => Severity::Error,
            },
            ReconcileError::Json(err) if err.is_io() => Severity::Critical,
            ReconcileError::Xml(err) if error_chain_contains_io(err) => Severity::Critical,
            ReconcileError::UnsupportedFormat { .. } => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

/// Context about one source load attempt.
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// The input path.
    pub path: PathBuf,
    /// Detected (or forced) format; `None` if it could not be determined.
    pub format: Option<SourceFormat>,
}

/// Stats reported when a source loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    pub columns: usize,
    pub rows: usize,
}

/// Pipeline stages reported through [`PipelineObserver::on_stage_complete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unify,
    Merge,
    Compose,
    Aggregate,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Stage::Unify => "unify",
            Stage::Merge => "merge",
            Stage::Compose => "compose",
            Stage::Aggregate => "aggregate",
        };
        f.write_str(s)
    }
}

/// Shape of a stage's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub columns: usize,
    pub rows: usize,
}

/// Observer interface for pipeline events.
///
/// All methods default to no-ops.
pub trait PipelineObserver: Send + Sync {
    /// Called when a source loads.
    fn on_source_loaded(&self, _ctx: &SourceContext, _stats: LoadStats) {}

    /// Called when a source is skipped because it failed to load.
    fn on_source_skipped(&self, _ctx: &SourceContext, _severity: Severity, _error: &ReconcileError) {}

    /// Called when a skipped source meets the alert threshold.
    ///
    /// Default behavior forwards to [`Self::on_source_skipped`].
    fn on_alert(&self, ctx: &SourceContext, severity: Severity, error: &ReconcileError) {
        self.on_source_skipped(ctx, severity, error)
    }

    /// Called once after loading when fewer sources loaded than were requested.
    fn on_partial_load(&self, _loaded: usize, _requested: usize) {}

    /// Called after each reconciliation stage.
    fn on_stage_complete(&self, _report: StageReport) {}
}

/// Fans every pipeline event out to several sinks, e.g. `tracing` plus a log file.
#[derive(Default)]
pub struct CompositeObserver {
    sinks: Vec<Arc<dyn PipelineObserver>>,
}

impl CompositeObserver {
    /// Build a composite over `sinks`.
    ///
    /// Events reach the sinks in the order given; an empty list drops every event.
    pub fn new(sinks: Vec<Arc<dyn PipelineObserver>>) -> Self {
        Self { sinks }
    }

    fn each(&self, f: impl Fn(&dyn PipelineObserver)) {
        self.sinks.iter().for_each(|sink| f(sink.as_ref()));
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CompositeObserver({} sinks)", self.sinks.len())
    }
}

impl PipelineObserver for CompositeObserver {
    fn on_source_loaded(&self, ctx: &SourceContext, stats: LoadStats) {
        self.each(|sink| sink.on_source_loaded(ctx, stats));
    }

    fn on_source_skipped(&self, ctx: &SourceContext, severity: Severity, error: &ReconcileError) {
        self.each(|sink| sink.on_source_skipped(ctx, severity, error));
    }

    fn on_alert(&self, ctx: &SourceContext, severity: Severity, error: &ReconcileError) {
        self.each(|sink| sink.on_alert(ctx, severity, error));
    }

    fn on_partial_load(&self, loaded: usize, requested: usize) {
        self.each(|sink| sink.on_partial_load(loaded, requested));
    }

    fn on_stage_complete(&self, report: StageReport) {
        self.each(|sink| sink.on_stage_complete(report));
    }
}

/// Forwards pipeline events to `tracing`.
#[derive(Debug, Default)]
pub struct TracingObserver;

impl PipelineObserver for TracingObserver {
    fn on_source_loaded(&self, ctx: &SourceContext, stats: LoadStats) {
        tracing::info!(
            path = %ctx.path.display(),
            format = ?ctx.format,
            columns = stats.columns,
            rows = stats.rows,
            "source loaded"
        );
    }

    fn on_source_skipped(&self, ctx: &SourceContext, severity: Severity, error: &ReconcileError) {
        match severity {
            Severity::Info => {
                tracing::info!(path = %ctx.path.display(), %error, "source skipped")
            }
            Severity::Warning => {
                tracing::warn!(path = %ctx.path.display(), %error, "source skipped")
            }
            Severity::Error | Severity::Critical => {
                tracing::error!(path = %ctx.path.display(), ?severity, %error, "source skipped")
            }
        }
    }

    fn on_alert(&self, ctx: &SourceContext, severity: Severity, error: &ReconcileError) {
        tracing::error!(path = %ctx.path.display(), ?severity, %error, "ALERT: source skipped");
    }

    fn on_partial_load(&self, loaded: usize, requested: usize) {
        tracing::warn!(loaded, requested, "not all sources loaded");
    }

    fn on_stage_complete(&self, report: StageReport) {
        tracing::debug!(
            stage = %report.stage,
            columns = report.columns,
            rows = report.rows,
            "stage complete"
        );
    }
}

/// Appends one line per pipeline event to a local log file.
///
/// Each line is `<unix seconds> <event> <key=value ...>`. The file is reopened for every
/// event and write failures are dropped.
#[derive(Debug)]
pub struct FileObserver {
    log_path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileObserver {
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        Self {
            log_path: log_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Path events are appended to.
    pub fn log_path(&self) -> &Path {
        &self.log_path
    }

    fn record(&self, event: &str, fields: fmt::Arguments<'_>) {
        let line = format!("{} {event} {fields}\n", unix_ts());
        let _held = self.write_lock.lock();
        let opened = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path);
        if let Ok(mut file) = opened {
            let _ = file.write_all(line.as_bytes());
        }
    }
}

impl PipelineObserver for FileObserver {
    fn on_source_loaded(&self, ctx: &SourceContext, stats: LoadStats) {
        self.record(
            "loaded",
            format_args!(
                "format={:?} path={} columns={} rows={}",
                ctx.format,
                ctx.path.display(),
                stats.columns,
                stats.rows
            ),
        );
    }

    fn on_source_skipped(&self, ctx: &SourceContext, severity: Severity, error: &ReconcileError) {
        self.record(
            "skipped",
            format_args!(
                "severity={severity:?} format={:?} path={} err={error}",
                ctx.format,
                ctx.path.display()
            ),
        );
    }

    fn on_alert(&self, ctx: &SourceContext, severity: Severity, error: &ReconcileError) {
        self.record(
            "ALERT",
            format_args!(
                "severity={severity:?} format={:?} path={} err={error}",
                ctx.format,
                ctx.path.display()
            ),
        );
    }

    fn on_partial_load(&self, loaded: usize, requested: usize) {
        self.record("partial", format_args!("loaded={loaded} requested={requested}"));
    }

    fn on_stage_complete(&self, report: StageReport) {
        self.record(
            "stage",
            format_args!("{} columns={} rows={}", report.stage, report.columns, report.rows),
        );
    }
}

fn error_chain_contains_io(e: &(dyn StdError + 'static)) -> bool {
    let mut cur: Option<&(dyn StdError + 'static)> = Some(e);
    while let Some(err) = cur {
        if err.is::<std::io::Error>() {
            return true;
        }
        cur = err.source();
    }
    false
}

fn unix_ts() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_failures_are_critical_and_unsupported_is_warning() {
        let io = ReconcileError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert_eq!(Severity::for_load_error(&io), Severity::Critical);

        let unsupported = ReconcileError::UnsupportedFormat {
            path: PathBuf::from("a.txt"),
        };
        assert_eq!(Severity::for_load_error(&unsupported), Severity::Warning);

        let shape = ReconcileError::SourceFormat {
            message: "x".to_string(),
        };
        assert_eq!(Severity::for_load_error(&shape), Severity::Error);
    }

    #[test]
    fn file_observer_appends_lines() {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let path = std::env::temp_dir().join(format!("table-reconcile-observer-{nanos}.log"));
        let obs = FileObserver::new(path.clone());
        assert_eq!(obs.log_path(), path.as_path());
        let ctx = SourceContext {
            path: PathBuf::from("data.csv"),
            format: Some(SourceFormat::Csv),
        };
        obs.on_source_loaded(&ctx, LoadStats { columns: 2, rows: 3 });
        obs.on_stage_complete(StageReport {
            stage: Stage::Merge,
            columns: 2,
            rows: 3,
        });

        let text = std::fs::read_to_string(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].ends_with(" loaded format=Some(Csv) path=data.csv columns=2 rows=3"));
        assert!(lines[1].ends_with(" stage merge columns=2 rows=3"));
    }
}
