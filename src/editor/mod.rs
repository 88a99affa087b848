//! Row-based predicate editor and its translation to and from predicate trees

pub mod bridge;
pub mod row;

pub use bridge::{rows_to_tree, tree_to_rows, RowEditor, RowIssue, RowsOutcome};
pub use row::{Row, RowKind};
