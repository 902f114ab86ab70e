//! Column classification and value coercion.
//!
//! The role of a column is purely syntactic: names starting with `D` are dimensions, every
//! other prefix is a measure.

use crate::error::{ReconcileError, ReconcileResult};
use crate::types::{ColumnRole, Value};

/// Prefix character marking a dimension column.
pub const DIMENSION_PREFIX: char = 'D';

/// Role for a column prefix character.
pub fn classify_prefix(prefix: char) -> ColumnRole {
    if prefix == DIMENSION_PREFIX {
        ColumnRole::Dimension
    } else {
        ColumnRole::Measure
    }
}

/// Role for a raw column name. The empty name classifies as a measure.
pub fn classify(name: &str) -> ColumnRole {
    match name.chars().next() {
        Some(c) => classify_prefix(c),
        None => ColumnRole::Measure,
    }
}

/// Back-fill value used when a source lacks a column of the given role.
pub fn filler(role: ColumnRole) -> Value {
    match role {
        ColumnRole::Dimension => Value::Text(String::new()),
        ColumnRole::Measure => Value::Int(0),
    }
}

/// Coerce a measure cell to an integer.
///
/// `row` is reported 1-based in the error.
pub fn coerce_measure(column: &str, row: usize, value: &Value) -> ReconcileResult<i64> {
    match value {
        Value::Int(v) => Ok(*v),
        Value::Text(raw) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| ReconcileError::NonNumericMeasure {
                column: column.to_owned(),
                row,
                raw: raw.clone(),
            }),
    }
}

/// Dimension cells are opaque strings; integers are rendered in decimal.
pub fn coerce_dimension(value: &Value) -> String {
    match value {
        Value::Text(s) => s.clone(),
        Value::Int(v) => v.to_string(),
    }
}
