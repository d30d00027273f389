//! Translates correction suggestions into store updates.

use serde::Serialize;

use crate::state::{CellRecord, CellStatus, Coordinate, CorrectionSuggestion, StateStore};

/// What one correction pass did.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorrectionPassReport {
    /// Candidate records built.
    pub cells: usize,
    /// Cells whose record actually changed.
    pub changed: usize,
    /// Entries dropped because their suggestion list was empty.
    pub dropped_empty: usize,
    /// Column names that could not be resolved (named passes only).
    pub skipped_columns: Vec<String>,
}

/// Marks cells with suggestions as `Correctable`.
///
/// A fresh suggestion list replaces the old one. The cell's existing detail is
/// read from the store right before the candidate is built, so validation
/// messages survive. Empty lists mean "nothing new" and leave the cell alone.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorrectionAdapter;

impl CorrectionAdapter {
    /// Create a correction adapter.
    pub fn new() -> Self {
        Self
    }

    /// Apply one correction pass as a single store update.
    pub fn apply<I>(&self, store: &mut StateStore, suggestions: I) -> CorrectionPassReport
    where
        I: IntoIterator<Item = (Coordinate, Vec<CorrectionSuggestion>)>,
    {
        let span = tracing::debug_span!("correction_pass");
        let _enter = span.enter();

        let mut report = CorrectionPassReport::default();
        let mut candidates = Vec::new();

        for (coord, suggestions) in suggestions {
            if suggestions.is_empty() {
                report.dropped_empty += 1;
                continue;
            }

            let detail = store.get_record(coord).and_then(|record| record.detail);
            candidates.push((
                coord,
                CellRecord {
                    status: CellStatus::Correctable,
                    detail,
                    suggestions,
                },
            ));
        }

        report.cells = candidates.len();
        report.changed = store.apply_changes(candidates);

        tracing::debug!(
            cells = report.cells,
            changed = report.changed,
            dropped = report.dropped_empty,
            "correction pass applied"
        );
        report
    }

    /// Apply a pass if there is one; `None` does nothing.
    pub fn apply_optional<I>(
        &self,
        store: &mut StateStore,
        suggestions: Option<I>,
    ) -> CorrectionPassReport
    where
        I: IntoIterator<Item = (Coordinate, Vec<CorrectionSuggestion>)>,
    {
        match suggestions {
            Some(suggestions) => self.apply(store, suggestions),
            None => CorrectionPassReport::default(),
        }
    }

    /// Apply suggestions keyed by `(row, column name)`, resolving names through the column map.
    ///
    /// Entries for unknown columns are skipped and reported.
    pub fn apply_named<I, S>(&self, store: &mut StateStore, suggestions: I) -> CorrectionPassReport
    where
        I: IntoIterator<Item = ((usize, S), Vec<CorrectionSuggestion>)>,
        S: AsRef<str>,
    {
        let mut skipped: Vec<String> = Vec::new();
        let mut resolved = Vec::new();

        for ((row, name), list) in suggestions {
            let name = name.as_ref();
            match store.column_index(name) {
                Some(column) => resolved.push((Coordinate::new(row, column), list)),
                None => {
                    if !skipped.iter().any(|s| s == name) {
                        tracing::warn!(
                            column = %name,
                            "correction column not in column map; skipping"
                        );
                        skipped.push(name.to_string());
                    }
                }
            }
        }

        let mut report = self.apply(store, resolved);
        report.skipped_columns = skipped;
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn fix(from: &str, to: &str) -> CorrectionSuggestion {
        CorrectionSuggestion::new(from, to)
    }

    #[test]
    fn test_marks_cells_correctable() {
        let mut store = StateStore::new();
        let report = CorrectionAdapter::new().apply(
            &mut store,
            [(Coordinate::new(0, 0), vec![fix("NYC", "New York")])],
        );

        assert_eq!(report.cells, 1);
        assert_eq!(report.changed, 1);
        let record = store.get_record(Coordinate::new(0, 0)).unwrap();
        assert_eq!(record.status, CellStatus::Correctable);
        assert_eq!(record.suggestions, vec![fix("NYC", "New York")]);
        assert!(record.detail.is_none());
    }

    #[test]
    fn test_keeps_existing_detail() {
        let mut store = StateStore::new();
        store.apply_changes([(
            Coordinate::new(2, 1),
            CellRecord::new(CellStatus::Invalid).with_detail("unknown city"),
        )]);

        CorrectionAdapter::new().apply(
            &mut store,
            [(Coordinate::new(2, 1), vec![fix("Bostn", "Boston")])],
        );

        let record = store.get_record(Coordinate::new(2, 1)).unwrap();
        assert_eq!(record.status, CellStatus::Correctable);
        assert_eq!(record.detail.as_deref(), Some("unknown city"));
    }

    #[test]
    fn test_new_suggestions_replace_old() {
        let mut store = StateStore::new();
        let adapter = CorrectionAdapter::new();
        adapter.apply(&mut store, [(Coordinate::new(0, 0), vec![fix("a", "b"), fix("a", "c")])]);
        adapter.apply(&mut store, [(Coordinate::new(0, 0), vec![fix("a", "d")])]);

        assert_eq!(
            store.get_record(Coordinate::new(0, 0)).unwrap().suggestions,
            vec![fix("a", "d")]
        );
    }

    #[test]
    fn test_empty_lists_are_dropped() {
        let mut store = StateStore::new();
        store.apply_changes([(Coordinate::new(1, 1), CellRecord::new(CellStatus::Invalid))]);

        let mut input = HashMap::new();
        input.insert(Coordinate::new(1, 1), Vec::new());
        input.insert(Coordinate::new(3, 0), Vec::new());
        let report = CorrectionAdapter::new().apply(&mut store, input);

        assert_eq!(report.dropped_empty, 2);
        assert_eq!(report.changed, 0);
        assert_eq!(store.get_status(Coordinate::new(1, 1)), CellStatus::Invalid);
        assert!(store.get_record(Coordinate::new(3, 0)).is_none());
    }

    #[test]
    fn test_none_is_noop() {
        let mut store = StateStore::new();
        let mut rx = store.subscribe_channel();
        let none: Option<HashMap<Coordinate, Vec<CorrectionSuggestion>>> = None;

        let report = CorrectionAdapter::new().apply_optional(&mut store, none);

        assert_eq!(report, CorrectionPassReport::default());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_apply_named_resolves_columns() {
        let mut store = StateStore::with_columns(["name", "city"]);
        let report = CorrectionAdapter::new().apply_named(
            &mut store,
            [
                ((0, "city"), vec![fix("NYC", "New York")]),
                ((1, "zip"), vec![fix("0211", "02110")]),
                ((2, "zip"), vec![fix("9021", "90210")]),
            ],
        );

        assert_eq!(report.cells, 1);
        assert_eq!(report.skipped_columns, vec!["zip"]);
        assert_eq!(store.get_status(Coordinate::new(0, 1)), CellStatus::Correctable);
    }
}
