//! Translates validation result sets into store updates.

use serde::Serialize;
use serde_json::Value;

use super::result::ValidationResultSet;
use super::status::StatusReading;
use crate::config::ValidationConfig;
use crate::state::{CellRecord, Coordinate, StateStore};

/// What one validation pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationPassReport {
    /// Rows in the result set.
    pub rows: usize,
    /// Candidate records built.
    pub cells: usize,
    /// Cells whose record actually changed.
    pub changed: usize,
    /// Tracked columns missing from the store's column map.
    pub skipped_columns: Vec<String>,
    /// Cells whose status or message was malformed and fell back to defaults.
    pub degraded_cells: usize,
}

/// Applies wide-format validation results to a [`StateStore`].
///
/// Each (row, tracked column) becomes one candidate record: the mapped
/// status, the message as detail, and whatever suggestions the store already
/// holds for that cell. Suggestions are read from the store right before the
/// candidate is built and never cached between passes.
#[derive(Debug, Clone)]
pub struct ValidationAdapter {
    tracked_columns: Vec<String>,
    config: ValidationConfig,
}

impl ValidationAdapter {
    /// Create an adapter tracking the given columns.
    pub fn new<I, S>(tracked_columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            tracked_columns: tracked_columns.into_iter().map(Into::into).collect(),
            config: ValidationConfig::default(),
        }
    }

    /// Create an adapter tracking every column that has a status field in `results`.
    pub fn inferred(results: &ValidationResultSet, config: ValidationConfig) -> Self {
        Self {
            tracked_columns: results.infer_tracked_columns(&config.status_suffix),
            config,
        }
    }

    /// Use custom field suffixes.
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self
    }

    /// Columns this adapter reads.
    pub fn tracked_columns(&self) -> &[String] {
        &self.tracked_columns
    }

    /// Apply one validation pass as a single store update.
    pub fn apply(
        &self,
        store: &mut StateStore,
        results: &ValidationResultSet,
    ) -> ValidationPassReport {
        let span = tracing::debug_span!("validation_pass", rows = results.row_count());
        let _enter = span.enter();

        let mut report = ValidationPassReport {
            rows: results.row_count(),
            ..Default::default()
        };

        let mut resolved = Vec::with_capacity(self.tracked_columns.len());
        for name in &self.tracked_columns {
            match store.column_index(name) {
                Some(index) => resolved.push((
                    name.as_str(),
                    index,
                    format!("{}{}", name, self.config.status_suffix),
                    format!("{}{}", name, self.config.message_suffix),
                )),
                None => {
                    tracing::warn!(column = %name, "tracked column not in column map; skipping");
                    report.skipped_columns.push(name.clone());
                }
            }
        }

        let mut candidates = Vec::with_capacity(results.row_count() * resolved.len());
        for (row, fields) in results.rows().enumerate() {
            for (name, column, status_field, message_field) in &resolved {
                let coord = Coordinate::new(row, *column);

                let reading = StatusReading::from_field(fields.get(status_field));
                let mut degraded = false;
                if let StatusReading::Unrecognized(raw) = &reading {
                    tracing::warn!(
                        row,
                        column = %name,
                        value = %raw,
                        "unrecognized validation status"
                    );
                    degraded = true;
                }

                let (detail, garbled) = read_message(fields.get(message_field));
                if garbled {
                    tracing::warn!(row, column = %name, "malformed validation message dropped");
                    degraded = true;
                }
                if degraded {
                    report.degraded_cells += 1;
                }

                let suggestions = store
                    .get_record(coord)
                    .map(|record| record.suggestions)
                    .unwrap_or_default();

                candidates.push((
                    coord,
                    CellRecord {
                        status: reading.cell_status(),
                        detail,
                        suggestions,
                    },
                ));
            }
        }

        report.cells = candidates.len();
        report.changed = store.apply_changes(candidates);

        tracing::debug!(
            cells = report.cells,
            changed = report.changed,
            skipped = report.skipped_columns.len(),
            degraded = report.degraded_cells,
            "validation pass applied"
        );
        report
    }

    /// Apply a pass if there is one; `None` does nothing.
    pub fn apply_optional(
        &self,
        store: &mut StateStore,
        results: Option<&ValidationResultSet>,
    ) -> ValidationPassReport {
        match results {
            Some(results) => self.apply(store, results),
            None => ValidationPassReport::default(),
        }
    }
}

/// Read a message field. Returns the detail and whether the payload was malformed.
fn read_message(value: Option<&Value>) -> (Option<String>, bool) {
    match value {
        None | Some(Value::Null) => (None, false),
        Some(Value::String(s)) if s.trim().is_empty() => (None, false),
        Some(Value::String(s)) => (Some(s.clone()), false),
        Some(Value::Number(n)) => (Some(n.to_string()), false),
        Some(Value::Bool(b)) => (Some(b.to_string()), false),
        Some(Value::Array(_) | Value::Object(_)) => (None, true),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{CellStatus, CorrectionSuggestion};
    use crate::validation::{ResultRow, ValidationStatus};
    use serde_json::json;

    fn store() -> StateStore {
        StateStore::with_columns(["name", "age", "city"])
    }

    #[test]
    fn test_maps_statuses_and_messages() {
        let mut store = store();
        let results = ValidationResultSet::new()
            .with_cell(0, "age", ValidationStatus::Invalid, "age must be positive")
            .with_cell(0, "name", ValidationStatus::Valid, "")
            .with_cell(1, "age", ValidationStatus::InvalidRow, "row rejected");

        let report = ValidationAdapter::new(["name", "age"]).apply(&mut store, &results);

        assert_eq!(report.rows, 2);
        assert_eq!(report.cells, 4);
        assert_eq!(report.changed, 3);
        assert_eq!(store.get_status(Coordinate::new(0, 1)), CellStatus::Invalid);
        assert_eq!(
            store.get_record(Coordinate::new(0, 1)).unwrap().detail.as_deref(),
            Some("age must be positive")
        );
        assert_eq!(store.get_status(Coordinate::new(0, 0)), CellStatus::Valid);
        assert!(store.get_record(Coordinate::new(0, 0)).unwrap().detail.is_none());
        assert_eq!(store.get_status(Coordinate::new(1, 1)), CellStatus::Invalid);
        // Row 1 has no name fields: missing status on an empty cell creates nothing
        assert!(store.get_record(Coordinate::new(1, 0)).is_none());
    }

    #[test]
    fn test_keeps_existing_suggestions() {
        let mut store = store();
        let suggestion = CorrectionSuggestion::new("-4", "4");
        store.apply_changes([(
            Coordinate::new(0, 1),
            CellRecord::new(CellStatus::Correctable).with_suggestions(vec![suggestion.clone()]),
        )]);

        let results =
            ValidationResultSet::new().with_cell(0, "age", ValidationStatus::Invalid, "negative");
        ValidationAdapter::new(["age"]).apply(&mut store, &results);

        let record = store.get_record(Coordinate::new(0, 1)).unwrap();
        assert_eq!(record.status, CellStatus::Invalid);
        assert_eq!(record.suggestions, vec![suggestion]);
    }

    #[test]
    fn test_unknown_column_is_skipped() {
        let mut store = store();
        let results = ValidationResultSet::new()
            .with_cell(0, "zip", ValidationStatus::Invalid, "bad zip")
            .with_cell(0, "city", ValidationStatus::Invalid, "bad city");

        let report = ValidationAdapter::new(["zip", "city"]).apply(&mut store, &results);

        assert_eq!(report.skipped_columns, vec!["zip"]);
        assert_eq!(report.cells, 1);
        assert_eq!(store.get_by_status(CellStatus::Invalid), vec![Coordinate::new(0, 2)]);
    }

    #[test]
    fn test_garbled_status_degrades_to_normal() {
        let mut store = store();
        store.apply_changes([(Coordinate::new(0, 0), CellStatus::Invalid)]);

        let mut row = ResultRow::new();
        row.insert("name_status".to_string(), json!(17));
        row.insert("name_message".to_string(), json!({"nested": "oops"}));
        let results = ValidationResultSet::from_rows(vec![row]);

        let report = ValidationAdapter::new(["name"]).apply(&mut store, &results);

        assert_eq!(report.degraded_cells, 1);
        let record = store.get_record(Coordinate::new(0, 0)).unwrap();
        assert_eq!(record.status, CellStatus::Normal);
        assert!(record.detail.is_none());
    }

    #[test]
    fn test_not_validated_resets_status_but_keeps_entry() {
        let mut store = store();
        let adapter = ValidationAdapter::new(["name"]);
        adapter.apply(
            &mut store,
            &ValidationResultSet::new().with_cell(0, "name", ValidationStatus::Invalid, "empty"),
        );
        adapter.apply(
            &mut store,
            &ValidationResultSet::new().with_cell(0, "name", ValidationStatus::NotValidated, ""),
        );

        assert_eq!(store.get_by_status(CellStatus::Normal), vec![Coordinate::new(0, 0)]);
    }

    #[test]
    fn test_repeated_pass_changes_nothing() {
        let mut store = store();
        let adapter = ValidationAdapter::new(["age"]);
        let results =
            ValidationResultSet::new().with_cell(0, "age", ValidationStatus::Invalid, "bad");

        assert_eq!(adapter.apply(&mut store, &results).changed, 1);
        assert_eq!(adapter.apply(&mut store, &results).changed, 0);
    }

    #[test]
    fn test_inferred_adapter_and_custom_suffixes() {
        let mut row = ResultRow::new();
        row.insert("city.state".to_string(), json!("correctable"));
        row.insert("city.msg".to_string(), json!("did you mean Boston?"));
        let results = ValidationResultSet::from_rows(vec![row]);
        let config = ValidationConfig {
            status_suffix: ".state".to_string(),
            message_suffix: ".msg".to_string(),
        };

        let adapter = ValidationAdapter::inferred(&results, config);
        assert_eq!(adapter.tracked_columns(), ["city".to_string()]);

        let mut store = store();
        adapter.apply(&mut store, &results);
        assert_eq!(store.get_status(Coordinate::new(0, 2)), CellStatus::Correctable);
    }

    #[test]
    fn test_apply_optional_none() {
        let mut store = store();
        let report = ValidationAdapter::new(["age"]).apply_optional(&mut store, None);
        assert_eq!(report, ValidationPassReport::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_read_message() {
        assert_eq!(read_message(None), (None, false));
        assert_eq!(read_message(Some(&json!("  "))), (None, false));
        assert_eq!(read_message(Some(&json!("bad"))), (Some("bad".to_string()), false));
        assert_eq!(read_message(Some(&json!(12))), (Some("12".to_string()), false));
        assert_eq!(read_message(Some(&json!([1, 2]))), (None, true));
    }
}
