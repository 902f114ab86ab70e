//! Tab-separated output sinks.
//!
//! Cells are joined with `\t` and rows end with `\n`. Nothing is quoted or escaped; values
//! are assumed to contain neither delimiter.

use std::io::{self, Write};
use std::path::Path;

use crate::error::ReconcileResult;
use crate::types::{ColumnName, Value};

/// Write `header` followed by `rows` as TSV.
///
/// Rows are written verbatim, so a record holding one empty cell is an empty line.
pub fn write_tsv<W: io::Write>(
    writer: W,
    header: &[ColumnName],
    rows: &[Vec<Value>],
) -> ReconcileResult<()> {
    let mut out = io::BufWriter::new(writer);
    write_line(&mut out, header.iter().map(ColumnName::as_str))?;
    for row in rows {
        write_line(&mut out, row.iter().map(Value::to_string))?;
    }
    out.flush()?;
    Ok(())
}

fn write_line<W, I, S>(out: &mut W, cells: I) -> io::Result<()>
where
    W: io::Write,
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for (i, cell) in cells.into_iter().enumerate() {
        if i > 0 {
            out.write_all(b"\t")?;
        }
        out.write_all(cell.as_ref().as_bytes())?;
    }
    out.write_all(b"\n")
}

/// Write TSV to a file, creating or truncating it.
pub fn write_tsv_to_path(
    path: impl AsRef<Path>,
    header: &[ColumnName],
    rows: &[Vec<Value>],
) -> ReconcileResult<()> {
    let file = std::fs::File::create(path)?;
    write_tsv(file, header, rows)
}

/// Render TSV into a `String`.
pub fn render_tsv(header: &[ColumnName], rows: &[Vec<Value>]) -> ReconcileResult<String> {
    let mut buf = Vec::new();
    write_tsv(&mut buf, header, rows)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
