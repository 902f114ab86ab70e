//! Schema reconciliation and aggregation.
//!
//! Every step is a pure function over in-memory tables:
//!
//! - [`unify_schema()`]: canonical union of column names across source tables
//! - [`merge()`]: concatenate tables over the unified schema with back-fill
//! - [`compose_rows()`]: column-oriented merged table -> rows sorted by a key column
//! - [`group_and_sum()`]: sum measures per distinct dimension tuple
//!
//! Column roles come from [`classify`].
//!
//! ## Example
//!
//! ```rust
//! use table_reconcile::processing::{compose_rows, group_and_sum, merge, unify_schema};
//! use table_reconcile::types::{NormalizedTable, Value};
//!
//! # fn main() -> Result<(), table_reconcile::ReconcileError> {
//! let a = NormalizedTable::new(vec![
//!     ("D1".to_string(), vec![Value::from("x"), Value::from("y")]),
//!     ("M1".to_string(), vec![Value::Int(5), Value::Int(2)]),
//! ])?;
//! let b = NormalizedTable::new(vec![
//!     ("D1".to_string(), vec![Value::from("x")]),
//!     ("M1".to_string(), vec![Value::from("3")]),
//! ])?;
//! let tables = vec![a, b];
//!
//! let schema = unify_schema(&tables)?;
//! let merged = merge(&tables, &schema)?;
//! let basic = compose_rows(&merged, "D1")?;
//! let advanced = group_and_sum(&basic)?;
//!
//! assert_eq!(advanced.rows, vec![
//!     vec![Value::from("x"), Value::Int(8)],
//!     vec![Value::from("y"), Value::Int(2)],
//! ]);
//! # Ok(())
//! # }
//! ```

pub mod aggregate;
pub mod classify;
pub mod compose;
pub mod unify;

pub use aggregate::group_and_sum;
pub use classify::classify;
pub use compose::compose_rows;
pub use unify::{merge, unify_schema};
