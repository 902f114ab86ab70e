//! Schema unification and table merging.

use crate::error::{ReconcileError, ReconcileResult};
use crate::types::{ColumnName, ColumnValues, MergedTable, NormalizedTable, UnifiedSchema};

use super::classify::{coerce_dimension, coerce_measure};

/// Union of all column names across `tables`, in canonical order.
///
/// Canonical order puts every `D` column first, then every other column. Within each
/// group names sort by prefix, then numeric index, then raw name, so `{A1, D1}` unifies
/// to `[D1, A1]`.
///
/// Fails with [`ReconcileError::MalformedColumnName`] on the first name that is not
/// `<prefix><non-negative integer>`.
pub fn unify_schema(tables: &[NormalizedTable]) -> ReconcileResult<UnifiedSchema> {
    let mut names: Vec<&str> = tables.iter().flat_map(|t| t.column_names()).collect();
    names.sort_unstable();
    names.dedup();

    let columns = names
        .into_iter()
        .map(ColumnName::parse)
        .collect::<ReconcileResult<Vec<_>>>()?;
    Ok(UnifiedSchema::new(columns))
}

/// Concatenate `tables` (in input order) over `schema`.
///
/// Columns a table lacks are back-filled for that table's row count: `""` for dimensions,
/// `0` for measures. Present values are coerced according to the column role.
pub fn merge(tables: &[NormalizedTable], schema: &UnifiedSchema) -> ReconcileResult<MergedTable> {
    let mut columns: Vec<ColumnValues> = schema
        .columns()
        .iter()
        .map(|c| ColumnValues::empty(c.role()))
        .collect();

    for (table_idx, table) in tables.iter().enumerate() {
        let row_count = table.row_count().ok_or_else(|| ReconcileError::EmptyTable {
            source_name: table_label(table, table_idx),
        })?;

        for (column, out) in schema.columns().iter().zip(columns.iter_mut()) {
            let values = table.column(column.as_str());
            match out {
                ColumnValues::Dimension(acc) => match values {
                    Some(values) => acc.extend(values.iter().map(coerce_dimension)),
                    None => acc.extend(std::iter::repeat_n(String::new(), row_count)),
                },
                ColumnValues::Measure(acc) => match values {
                    Some(values) => {
                        acc.reserve(values.len());
                        for (row_idx0, v) in values.iter().enumerate() {
                            acc.push(coerce_measure(column.as_str(), row_idx0 + 1, v)?);
                        }
                    }
                    None => acc.extend(std::iter::repeat_n(0, row_count)),
                },
            }
        }
    }

    Ok(MergedTable {
        schema: schema.clone(),
        columns,
    })
}

fn table_label(table: &NormalizedTable, idx: usize) -> String {
    if table.source().is_empty() {
        format!("table #{idx}")
    } else {
        table.source().to_owned()
    }
}
