//! Core data model types.
//!
//! Sources are loaded into [`NormalizedTable`]s (column name -> values), reconciled into a
//! [`MergedTable`] over a [`UnifiedSchema`], and finally turned into row-oriented
//! [`RowMatrix`] / [`AggregatedTable`] outputs.

use std::cmp::Ordering;
use std::fmt;

use crate::error::{ReconcileError, ReconcileResult};

/// A single cell value.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// UTF-8 string (possibly empty).
    Text(String),
}

impl Value {
    /// Returns the string payload of a [`Value::Text`].
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Int(_) => None,
        }
    }

    /// Returns the integer payload of a [`Value::Int`].
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(v) => Some(*v),
            Value::Text(_) => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(v) => write!(f, "{v}"),
            Value::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

/// Semantic role of a column, derived from its name prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ColumnRole {
    /// Key/grouping column (prefix `D`), string-valued.
    Dimension,
    /// Summable integer column (any other prefix).
    Measure,
}

/// A parsed `<prefix><index>` column name, e.g. `D1` or `M3`.
///
/// Ordering puts every dimension before every measure, then sorts by prefix and numeric
/// index. The raw name breaks remaining ties (`D01` vs `D1`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnName {
    name: String,
    prefix: char,
    index: u64,
    role: ColumnRole,
}

impl ColumnName {
    /// Parse a raw column name.
    pub fn parse(raw: &str) -> ReconcileResult<Self> {
        let malformed = || ReconcileError::MalformedColumnName {
            name: raw.to_owned(),
        };

        let mut chars = raw.chars();
        let prefix = chars.next().ok_or_else(malformed)?;
        let suffix = chars.as_str();
        if suffix.is_empty() || !suffix.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let index = suffix.parse::<u64>().map_err(|_| malformed())?;

        Ok(Self {
            name: raw.to_owned(),
            prefix,
            index,
            role: crate::processing::classify::classify_prefix(prefix),
        })
    }

    /// The raw column name.
    pub fn as_str(&self) -> &str {
        &self.name
    }

    pub fn prefix(&self) -> char {
        self.prefix
    }

    pub fn index(&self) -> u64 {
        self.index
    }

    pub fn role(&self) -> ColumnRole {
        self.role
    }

    pub fn is_dimension(&self) -> bool {
        self.role == ColumnRole::Dimension
    }
}

impl Ord for ColumnName {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.role, self.prefix, self.index, &self.name).cmp(&(
            other.role,
            other.prefix,
            other.index,
            &other.name,
        ))
    }
}

impl PartialOrd for ColumnName {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ColumnName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// A column-oriented table as produced by a source adapter.
///
/// Columns keep insertion order. All columns have the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizedTable {
    source: String,
    columns: Vec<(String, Vec<Value>)>,
}

impl NormalizedTable {
    /// Build a table from `(name, values)` pairs.
    ///
    /// A repeated name replaces the earlier column in place. Fails with
    /// [`ReconcileError::RaggedTable`] if the columns disagree on their length.
    pub fn new(columns: Vec<(String, Vec<Value>)>) -> ReconcileResult<Self> {
        let mut deduped: Vec<(String, Vec<Value>)> = Vec::with_capacity(columns.len());
        for (name, values) in columns {
            match deduped.iter_mut().find(|(n, _)| *n == name) {
                Some(slot) => slot.1 = values,
                None => deduped.push((name, values)),
            }
        }

        if let Some((_, first)) = deduped.first() {
            let expected = first.len();
            if let Some((name, values)) = deduped.iter().find(|(_, v)| v.len() != expected) {
                return Err(ReconcileError::RaggedTable {
                    column: name.clone(),
                    expected,
                    found: values.len(),
                });
            }
        }

        Ok(Self {
            source: String::new(),
            columns: deduped,
        })
    }

    /// Attach a label (typically the file path) used in diagnostics.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = source.into();
        self
    }

    /// Diagnostic label of the table (empty if none was attached).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Number of columns.
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Row count, or `None` for a table without columns.
    pub fn row_count(&self) -> Option<usize> {
        self.columns.first().map(|(_, v)| v.len())
    }

    /// Iterate column names in insertion order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(n, _)| n.as_str())
    }

    /// Values of a column, if present.
    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Iterate `(name, values)` pairs in insertion order.
    pub fn columns(&self) -> impl Iterator<Item = (&str, &[Value])> {
        self.columns.iter().map(|(n, v)| (n.as_str(), v.as_slice()))
    }
}

/// The canonical, sorted, duplicate-free set of columns across all loaded tables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UnifiedSchema {
    columns: Vec<ColumnName>,
}

impl UnifiedSchema {
    /// Build a schema from arbitrary column names; sorts and removes duplicates.
    pub fn new(mut columns: Vec<ColumnName>) -> Self {
        columns.sort();
        columns.dedup();
        Self { columns }
    }

    pub fn columns(&self) -> &[ColumnName] {
        &self.columns
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of a column by raw name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.as_str() == name)
    }

    /// Iterate raw names in schema order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.as_str())
    }
}

/// Typed storage for one merged column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnValues {
    Dimension(Vec<String>),
    Measure(Vec<i64>),
}

impl ColumnValues {
    /// An empty column of the given role.
    pub fn empty(role: ColumnRole) -> Self {
        match role {
            ColumnRole::Dimension => ColumnValues::Dimension(Vec::new()),
            ColumnRole::Measure => ColumnValues::Measure(Vec::new()),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnValues::Dimension(v) => v.len(),
            ColumnValues::Measure(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// All source tables concatenated over a [`UnifiedSchema`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTable {
    pub schema: UnifiedSchema,
    /// One column per schema entry, in schema order.
    pub columns: Vec<ColumnValues>,
}

impl MergedTable {
    /// Number of rows (0 for an empty schema).
    pub fn row_count(&self) -> usize {
        self.columns.first().map(ColumnValues::len).unwrap_or(0)
    }

    /// Column by raw name.
    pub fn column(&self, name: &str) -> Option<&ColumnValues> {
        self.schema.index_of(name).and_then(|i| self.columns.get(i))
    }
}

/// Row-oriented table: header plus data rows aligned to it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RowMatrix {
    pub header: Vec<ColumnName>,
    pub rows: Vec<Vec<Value>>,
}

impl RowMatrix {
    pub fn new(header: Vec<ColumnName>, rows: Vec<Vec<Value>>) -> Self {
        Self { header, rows }
    }

    /// Build a matrix from raw header names.
    pub fn from_names(header: &[&str], rows: Vec<Vec<Value>>) -> ReconcileResult<Self> {
        let header = header
            .iter()
            .map(|n| ColumnName::parse(n))
            .collect::<ReconcileResult<Vec<_>>>()?;
        Ok(Self { header, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a header column by raw name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|c| c.as_str() == name)
    }
}

/// Output of the grouping aggregator: one row per distinct dimension tuple.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AggregatedTable {
    pub header: Vec<ColumnName>,
    pub rows: Vec<Vec<Value>>,
}

impl AggregatedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// View the aggregate as a plain [`RowMatrix`] (e.g. to group it again).
    pub fn into_row_matrix(self) -> RowMatrix {
        RowMatrix {
            header: self.header,
            rows: self.rows,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn column_name_parses_prefix_and_index() {
        let c = ColumnName::parse("M12").unwrap();
        assert_eq!(c.prefix(), 'M');
        assert_eq!(c.index(), 12);
        assert_eq!(c.role(), ColumnRole::Measure);
        assert!(ColumnName::parse("D3").unwrap().is_dimension());
    }

    #[test]
    fn column_name_rejects_bad_suffixes() {
        for raw in ["", "D", "Dx", "M-1", "M+1", "M 1", "D1a"] {
            assert!(
                matches!(
                    ColumnName::parse(raw),
                    Err(ReconcileError::MalformedColumnName { .. })
                ),
                "{raw:?} should be malformed"
            );
        }
    }

    #[test]
    fn column_names_sort_dimensions_first_then_numeric_index() {
        let mut cols: Vec<ColumnName> = ["M10", "A1", "D2", "M2", "D10", "D1"]
            .iter()
            .map(|n| ColumnName::parse(n).unwrap())
            .collect();
        cols.sort();
        let names: Vec<&str> = cols.iter().map(|c| c.as_str()).collect();
        assert_eq!(names, vec!["D1", "D2", "D10", "A1", "M2", "M10"]);
    }

    #[test]
    fn normalized_table_rejects_ragged_columns() {
        let err = NormalizedTable::new(vec![
            ("D1".to_string(), vec![Value::from("a"), Value::from("b")]),
            ("M1".to_string(), vec![Value::Int(1)]),
        ])
        .unwrap_err();
        assert!(matches!(
            err,
            ReconcileError::RaggedTable { ref column, expected: 2, found: 1 } if column == "M1"
        ));
    }

    #[test]
    fn normalized_table_duplicate_column_replaces_in_place() {
        let t = NormalizedTable::new(vec![
            ("D1".to_string(), vec![Value::from("a")]),
            ("M1".to_string(), vec![Value::Int(1)]),
            ("D1".to_string(), vec![Value::from("z")]),
        ])
        .unwrap();
        assert_eq!(t.column_names().collect::<Vec<_>>(), vec!["D1", "M1"]);
        assert_eq!(t.column("D1"), Some(&[Value::from("z")][..]));
    }

    #[test]
    fn empty_table_has_no_row_count() {
        let t = NormalizedTable::new(Vec::new()).unwrap();
        assert_eq!(t.row_count(), None);
        assert_eq!(t.column_count(), 0);
    }
}
