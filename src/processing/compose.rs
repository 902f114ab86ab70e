//! Column-to-row composition.

use crate::error::{ReconcileError, ReconcileResult};
use crate::types::{ColumnValues, MergedTable, RowMatrix, Value};

/// Turn `merged` into a [`RowMatrix`] sorted ascending by `order_by`.
///
/// Dimension columns compare lexicographically, measure columns numerically. The sort is
/// stable, so rows with equal keys keep their merge order.
pub fn compose_rows(merged: &MergedTable, order_by: &str) -> ReconcileResult<RowMatrix> {
    let order_idx = merged
        .schema
        .index_of(order_by)
        .ok_or_else(|| ReconcileError::UnknownOrderColumn {
            column: order_by.to_owned(),
        })?;

    let row_count = merged.row_count();
    for (name, column) in merged.schema.names().zip(&merged.columns) {
        if column.len() != row_count {
            return Err(ReconcileError::RaggedTable {
                column: name.to_owned(),
                expected: row_count,
                found: column.len(),
            });
        }
    }

    let header = merged.schema.columns().to_vec();
    let mut rows: Vec<Vec<Value>> = (0..row_count)
        .map(|i| merged.columns.iter().map(|c| cell(c, i)).collect())
        .collect();

    // Cells of one column share a variant, so `Value`'s ordering is the natural one.
    rows.sort_by(|a, b| a[order_idx].cmp(&b[order_idx]));

    Ok(RowMatrix::new(header, rows))
}

fn cell(column: &ColumnValues, idx: usize) -> Value {
    match column {
        ColumnValues::Dimension(v) => Value::Text(v[idx].clone()),
        ColumnValues::Measure(v) => Value::Int(v[idx]),
    }
}
