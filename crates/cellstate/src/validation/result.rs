//! Wide-format validation result sets.

use indexmap::IndexMap;
use serde_json::Value;

use super::status::ValidationStatus;
use crate::error::{CellStateError, Result};
use crate::input::DataTable;

/// One logical row of validator output: field name to raw value.
pub type ResultRow = IndexMap<String, Value>;

/// Validator output with one row per table row.
///
/// For each tracked column `C` a row carries `C_status` and `C_message`
/// fields (suffixes are configurable on the adapter). Row position is the
/// table row index. Values are kept raw so malformed payloads can be degraded
/// cell by cell rather than rejected up front.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResultSet {
    rows: Vec<ResultRow>,
}

impl ValidationResultSet {
    /// Create an empty result set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create from prepared rows.
    pub fn from_rows(rows: Vec<ResultRow>) -> Self {
        Self { rows }
    }

    /// Read a validator export already parsed into a table; every cell becomes a string value.
    pub fn from_table(table: &DataTable) -> Self {
        let rows = table
            .rows
            .iter()
            .map(|row| {
                table
                    .headers
                    .iter()
                    .zip(row.iter())
                    .map(|(name, value)| (name.clone(), Value::String(value.clone())))
                    .collect()
            })
            .collect();
        Self { rows }
    }

    /// Parse a JSON array of objects, one per row.
    pub fn from_json(json: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(json)?;
        let Value::Array(items) = value else {
            return Err(CellStateError::Config(
                "validation results must be a JSON array of row objects".to_string(),
            ));
        };

        let rows = items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => map.into_iter().collect(),
                // A non-object row carries no fields; every cell in it reads as missing
                _ => ResultRow::new(),
            })
            .collect();
        Ok(Self { rows })
    }

    /// Record one cell's outcome, growing the row list as needed.
    pub fn with_cell(
        mut self,
        row: usize,
        column: &str,
        status: ValidationStatus,
        message: impl Into<String>,
    ) -> Self {
        self.set_cell(row, column, status, message);
        self
    }

    /// Record one cell's outcome using the default `_status` / `_message` suffixes.
    pub fn set_cell(
        &mut self,
        row: usize,
        column: &str,
        status: ValidationStatus,
        message: impl Into<String>,
    ) {
        if self.rows.len() <= row {
            self.rows.resize_with(row + 1, ResultRow::new);
        }
        let fields = &mut self.rows[row];
        fields.insert(format!("{column}_status"), Value::from(status.as_str()));
        fields.insert(format!("{column}_message"), Value::from(message.into()));
    }

    /// Add a row.
    pub fn push_row(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    /// Number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Check if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterate rows in table order.
    pub fn rows(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter()
    }

    /// Raw value of a field.
    pub fn field(&self, row: usize, name: &str) -> Option<&Value> {
        self.rows.get(row).and_then(|fields| fields.get(name))
    }

    /// Column names that have a `{name}{status_suffix}` field in any row, in first-seen order.
    pub fn infer_tracked_columns(&self, status_suffix: &str) -> Vec<String> {
        let mut columns: Vec<String> = Vec::new();
        for row in &self.rows {
            for name in row.keys() {
                if let Some(column) = name.strip_suffix(status_suffix) {
                    if !column.is_empty() && !columns.iter().any(|c| c == column) {
                        columns.push(column.to_string());
                    }
                }
            }
        }
        columns
    }
}
