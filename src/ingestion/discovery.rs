//! Expansion of CLI-style input arguments into source paths.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::{ReconcileError, ReconcileResult};

use super::unified::SourceFormat;

/// Expand `inputs` into a list of source paths, preserving argument order.
///
/// - A directory is walked recursively; only files with a supported extension are kept,
///   in file-name order.
/// - An argument containing `*`, `?` or `[` is a glob pattern; matches are sorted by path.
/// - Anything else is kept as-is (even if it does not exist or has an unsupported
///   extension, so that loading can report it).
pub fn expand_inputs<S: AsRef<str>>(inputs: &[S]) -> ReconcileResult<Vec<PathBuf>> {
    let mut out = Vec::new();
    for input in inputs {
        let input = input.as_ref();
        let path = Path::new(input);
        if path.is_dir() {
            out.extend(walk_dir(path)?);
        } else if is_glob(input) {
            out.extend(expand_glob(input)?);
        } else {
            out.push(path.to_path_buf());
        }
    }
    Ok(out)
}

fn is_glob(s: &str) -> bool {
    s.contains(['*', '?', '['])
}

fn walk_dir(dir: &Path) -> ReconcileResult<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.map_err(std::io::Error::from)?;
        if entry.file_type().is_file() && SourceFormat::from_path(entry.path()).is_some() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn expand_glob(pattern: &str) -> ReconcileResult<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|e| ReconcileError::InvalidPattern {
        pattern: pattern.to_owned(),
        message: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| e.into_error())?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
