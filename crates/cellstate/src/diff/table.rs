//! Elementwise comparison of two table snapshots.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::input::DataTable;

/// Rows and columns that differ between two snapshots.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDiff {
    /// Row indices with at least one changed cell.
    pub changed_rows: BTreeSet<usize>,
    /// Column names with at least one changed cell.
    pub changed_columns: BTreeSet<String>,
    /// The snapshots had different shapes; treat the result as "invalidate broadly".
    pub degraded: bool,
}

impl TableDiff {
    /// Check if nothing changed.
    pub fn is_empty(&self) -> bool {
        self.changed_rows.is_empty() && self.changed_columns.is_empty()
    }

    /// Cells to re-check: every changed row crossed with every changed column, row-major.
    ///
    /// This is a superset of the cells that actually differ.
    pub fn cells(&self) -> impl Iterator<Item = (usize, &str)> {
        self.changed_rows.iter().flat_map(move |&row| {
            self.changed_columns
                .iter()
                .map(move |column| (row, column.as_str()))
        })
    }
}

/// Compare two snapshots cell by cell.
///
/// Snapshots have the same shape when their row counts and ordered headers
/// match. Otherwise no cell comparison happens: the result covers every row
/// below the smaller row count and every column name present in both, with
/// `degraded` set. Null-like cells (see [`DataTable::is_null_value`]) compare
/// equal to each other.
pub fn diff_tables(old: &DataTable, new: &DataTable) -> TableDiff {
    if old.row_count() != new.row_count() || old.headers != new.headers {
        let rows = old.row_count().min(new.row_count());
        let changed_columns: BTreeSet<String> = old
            .headers
            .iter()
            .filter(|name| new.headers.contains(name))
            .cloned()
            .collect();

        tracing::debug!(
            old_rows = old.row_count(),
            new_rows = new.row_count(),
            old_columns = old.column_count(),
            new_columns = new.column_count(),
            "table shapes differ; diff degraded"
        );
        return TableDiff {
            changed_rows: (0..rows).collect(),
            changed_columns,
            degraded: true,
        };
    }

    if old.fingerprint() == new.fingerprint() {
        return TableDiff::default();
    }

    let mut diff = TableDiff::default();
    let mut changed_column_indices = BTreeSet::new();
    for row in 0..old.row_count() {
        for (column, _) in old.headers.iter().enumerate() {
            if !cells_equal(old.get(row, column), new.get(row, column)) {
                diff.changed_rows.insert(row);
                changed_column_indices.insert(column);
            }
        }
    }
    diff.changed_columns = changed_column_indices
        .into_iter()
        .map(|index| old.headers[index].clone())
        .collect();

    tracing::debug!(
        rows = diff.changed_rows.len(),
        columns = diff.changed_columns.len(),
        "table diff computed"
    );
    diff
}

/// Value equality where two missing values are equal. Cells beyond a short row read as missing.
fn cells_equal(old: Option<&str>, new: Option<&str>) -> bool {
    let old = old.filter(|value| !DataTable::is_null_value(value));
    let new = new.filter(|value| !DataTable::is_null_value(value));
    old == new
}
