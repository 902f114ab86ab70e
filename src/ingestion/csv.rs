//! CSV source adapter.

use std::path::Path;

use crate::error::ReconcileResult;
use crate::types::{NormalizedTable, Value};

/// Load a CSV file into a [`NormalizedTable`].
///
/// Rules:
///
/// - The first record holds the column names; every later record holds one value per column.
/// - All records must have the same width.
/// - Values are kept as raw text; coercion happens during merge.
pub fn load_csv_from_path(path: impl AsRef<Path>) -> ReconcileResult<NormalizedTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    load_csv_from_reader(&mut rdr)
}

/// Load CSV data from an existing CSV reader.
///
/// The reader should be built with `has_headers(false)`; otherwise the name row is consumed
/// by the reader and the first data row is taken as column names.
pub fn load_csv_from_reader<R: std::io::Read>(
    rdr: &mut csv::Reader<R>,
) -> ReconcileResult<NormalizedTable> {
    let mut records = rdr.records();
    let names = match records.next() {
        Some(record) => record?,
        None => return NormalizedTable::new(Vec::new()),
    };

    let mut columns: Vec<(String, Vec<Value>)> = names
        .iter()
        .map(|name| (name.to_owned(), Vec::new()))
        .collect();

    for result in records {
        let record = result?;
        for ((_, values), raw) in columns.iter_mut().zip(record.iter()) {
            values.push(Value::Text(raw.to_owned()));
        }
    }

    NormalizedTable::new(columns)
}
