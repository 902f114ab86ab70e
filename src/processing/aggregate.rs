//! Group-by-dimensions summation.

use std::collections::BTreeMap;

use crate::error::{ReconcileError, ReconcileResult};
use crate::types::{AggregatedTable, ColumnName, RowMatrix, Value};

use super::classify::{coerce_dimension, coerce_measure};

/// Sum measure columns per distinct tuple of dimension values.
///
/// The header must list every dimension column before every measure column. Output rows
/// are sorted ascending by their dimension tuple and the header is kept unchanged.
///
/// Dimension cells are grouped by their text form and always come out as
/// [`Value::Text`], so `Int(7)` and `"7"` land in the same group.
///
/// Errors:
///
/// - [`ReconcileError::DimensionAfterMeasure`] if the header interleaves roles
/// - [`ReconcileError::HeterogeneousRowLength`] if a row's width differs from the header
/// - [`ReconcileError::NonNumericMeasure`] if a measure cell is not an integer
/// - [`ReconcileError::MeasureOverflow`] if a sum does not fit in `i64`
pub fn group_and_sum(rows: &RowMatrix) -> ReconcileResult<AggregatedTable> {
    let dimension_count = dimension_prefix_len(&rows.header)?;
    let width = rows.header.len();
    let measures = &rows.header[dimension_count..];

    let mut groups: BTreeMap<Vec<Value>, Vec<i64>> = BTreeMap::new();
    for (row_idx0, row) in rows.rows.iter().enumerate() {
        let user_row = row_idx0 + 1;
        if row.len() != width {
            return Err(ReconcileError::HeterogeneousRowLength {
                row: user_row,
                expected: width,
                found: row.len(),
            });
        }

        let (key_cells, measure_cells) = row.split_at(dimension_count);
        let key: Vec<Value> = key_cells
            .iter()
            .map(|v| Value::Text(coerce_dimension(v)))
            .collect();

        let acc = groups
            .entry(key)
            .or_insert_with(|| vec![0; measures.len()]);
        for ((slot, cell), column) in acc.iter_mut().zip(measure_cells).zip(measures) {
            let v = coerce_measure(column.as_str(), user_row, cell)?;
            *slot = slot
                .checked_add(v)
                .ok_or_else(|| ReconcileError::MeasureOverflow {
                    column: column.as_str().to_owned(),
                })?;
        }
    }

    let out_rows = groups
        .into_iter()
        .map(|(mut key, sums)| {
            key.extend(sums.into_iter().map(Value::Int));
            key
        })
        .collect();

    Ok(AggregatedTable {
        header: rows.header.clone(),
        rows: out_rows,
    })
}

/// Number of leading dimension columns, checking no dimension follows a measure.
fn dimension_prefix_len(header: &[ColumnName]) -> ReconcileResult<usize> {
    let count = header.iter().take_while(|c| c.is_dimension()).count();
    if let Some(stray) = header[count..].iter().find(|c| c.is_dimension()) {
        return Err(ReconcileError::DimensionAfterMeasure {
            column: stray.as_str().to_owned(),
        });
    }
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::group_and_sum;
    use crate::error::ReconcileError;
    use crate::types::{RowMatrix, Value};

    fn t(s: &str) -> Value {
        Value::from(s)
    }

    fn i(v: i64) -> Value {
        Value::Int(v)
    }

    #[test]
    fn groups_and_sums_single_dimension() {
        let rows = RowMatrix::from_names(
            &["D1", "M1"],
            vec![vec![t("x"), i(5)], vec![t("x"), i(3)], vec![t("y"), i(2)]],
        )
        .unwrap();
        let out = group_and_sum(&rows).unwrap();
        assert_eq!(out.header, rows.header);
        assert_eq!(out.rows, vec![vec![t("x"), i(8)], vec![t("y"), i(2)]]);
    }

    #[test]
    fn keys_sort_componentwise_and_text_measures_are_coerced() {
        let rows = RowMatrix::from_names(
            &["D1", "D2", "M1", "M2"],
            vec![
                vec![t("b"), t("a"), t("1"), i(10)],
                vec![t("a"), t("b"), i(2), t("20")],
                vec![t("a"), t("a"), i(3), i(30)],
                vec![t("a"), t("b"), i(4), i(40)],
                vec![t(""), t(""), i(0), i(7)],
            ],
        )
        .unwrap();
        let out = group_and_sum(&rows).unwrap();
        assert_eq!(
            out.rows,
            vec![
                vec![t(""), t(""), i(0), i(7)],
                vec![t("a"), t("a"), i(3), i(30)],
                vec![t("a"), t("b"), i(6), i(60)],
                vec![t("b"), t("a"), i(1), i(10)],
            ]
        );
    }

    #[test]
    fn sum_invariant_holds_per_column() {
        let rows = RowMatrix::from_names(
            &["D1", "M1", "M2"],
            vec![
                vec![t("p"), i(1), i(-4)],
                vec![t("q"), i(2), i(5)],
                vec![t("p"), i(3), i(6)],
                vec![t("r"), i(4), i(0)],
            ],
        )
        .unwrap();
        let out = group_and_sum(&rows).unwrap();
        for col in 1..3 {
            let before: i64 = rows.rows.iter().map(|r| r[col].as_int().unwrap()).sum();
            let after: i64 = out.rows.iter().map(|r| r[col].as_int().unwrap()).sum();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn grouping_is_idempotent() {
        let rows = RowMatrix::from_names(
            &["D1", "M1"],
            vec![vec![t("y"), i(1)], vec![t("x"), i(2)], vec![t("y"), i(3)]],
        )
        .unwrap();
        let once = group_and_sum(&rows).unwrap();
        let twice = group_and_sum(&once.clone().into_row_matrix()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn integer_dimension_cells_group_with_their_text_form() {
        let rows = RowMatrix::from_names(
            &["D1", "M1"],
            vec![vec![i(7), i(1)], vec![t("7"), i(2)], vec![i(8), i(4)]],
        )
        .unwrap();
        let out = group_and_sum(&rows).unwrap();
        assert_eq!(out.rows, vec![vec![t("7"), i(3)], vec![t("8"), i(4)]]);
    }

    #[test]
    fn no_dimensions_collapses_to_single_total_row() {
        let rows = RowMatrix::from_names(&["M1"], vec![vec![i(1)], vec![i(2)]]).unwrap();
        let out = group_and_sum(&rows).unwrap();
        assert_eq!(out.rows, vec![vec![i(3)]]);
    }

    #[test]
    fn empty_input_yields_header_only() {
        let rows = RowMatrix::from_names(&["D1", "M1"], Vec::new()).unwrap();
        let out = group_and_sum(&rows).unwrap();
        assert_eq!(out.header.len(), 2);
        assert!(out.rows.is_empty());
    }

    #[test]
    fn rejects_rows_with_wrong_width() {
        let rows = RowMatrix::from_names(
            &["D1", "M1"],
            vec![vec![t("x"), i(1)], vec![t("x")]],
        )
        .unwrap();
        assert!(matches!(
            group_and_sum(&rows),
            Err(ReconcileError::HeterogeneousRowLength { row: 2, expected: 2, found: 1 })
        ));
    }

    #[test]
    fn rejects_dimension_after_measure() {
        let rows = RowMatrix::from_names(&["D1", "M1", "D2"], Vec::new()).unwrap();
        assert!(matches!(
            group_and_sum(&rows),
            Err(ReconcileError::DimensionAfterMeasure { ref column }) if column == "D2"
        ));
    }

    #[test]
    fn rejects_non_numeric_measure() {
        let rows = RowMatrix::from_names(&["D1", "M1"], vec![vec![t("x"), t("lots")]]).unwrap();
        assert!(matches!(
            group_and_sum(&rows),
            Err(ReconcileError::NonNumericMeasure { row: 1, .. })
        ));
    }

    #[test]
    fn reports_overflow() {
        let rows = RowMatrix::from_names(
            &["D1", "M1"],
            vec![vec![t("x"), i(i64::MAX)], vec![t("x"), i(1)]],
        )
        .unwrap();
        assert!(matches!(
            group_and_sum(&rows),
            Err(ReconcileError::MeasureOverflow { ref column }) if column == "M1"
        ));
    }
}
