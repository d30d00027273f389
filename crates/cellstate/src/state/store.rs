//! The sparse per-cell state store.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::{self, UnboundedReceiver};

use super::cell::{CellRecord, CellStatus, CellUpdate, Coordinate};
use super::notify::{
    ChangeKind, ChangeListener, ChangeNotification, ChannelListener, ListenerId, Listeners,
};
use crate::input::DataTable;

/// Counts of populated records by status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    counts: IndexMap<CellStatus, usize>,
}

impl StatusCounts {
    /// Records holding `status`.
    pub fn get(&self, status: CellStatus) -> usize {
        self.counts.get(&status).copied().unwrap_or(0)
    }

    /// Total populated records.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    /// Records whose status needs review (invalid, correctable, warning).
    pub fn needing_attention(&self) -> usize {
        self.counts
            .iter()
            .filter(|(status, _)| status.needs_attention())
            .map(|(_, count)| count)
            .sum()
    }

    fn increment(&mut self, status: CellStatus) {
        *self.counts.entry(status).or_insert(0) += 1;
    }
}

/// Sparse map from cell coordinate to [`CellRecord`], plus the column map.
///
/// A coordinate without a record reads as a default record (`Normal`, no
/// detail, no suggestions). `apply_changes` is the only merge path, and every
/// mutating call emits at most one notification.
///
/// The store does no locking. Hosts with concurrent producers should route
/// them through [`crate::SharedStore`] or their own queue.
#[derive(Default)]
pub struct StateStore {
    pub(crate) records: BTreeMap<Coordinate, CellRecord>,
    pub(crate) columns: IndexMap<String, usize>,
    schema_version: u64,
    listeners: Listeners,
}

impl StateStore {
    /// Create an empty store with no column map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store with a column map built from `column_names`.
    pub fn with_columns<I, S>(column_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut store = Self::new();
        store.refresh_schema(column_names);
        store
    }

    // --- queries ---------------------------------------------------------

    /// Status of a cell, `Normal` when it has no record.
    pub fn get_status(&self, coord: impl Into<Coordinate>) -> CellStatus {
        self.records
            .get(&coord.into())
            .map(|record| record.status)
            .unwrap_or_default()
    }

    /// Copy of a cell's record, `None` when the cell has never been populated.
    pub fn get_record(&self, coord: impl Into<Coordinate>) -> Option<CellRecord> {
        self.records.get(&coord.into()).cloned()
    }

    /// Populated coordinates holding `status`, ascending.
    ///
    /// Cells without a record are never returned, so querying `Normal` only
    /// yields cells explicitly set back to `Normal`.
    pub fn get_by_status(&self, status: CellStatus) -> Vec<Coordinate> {
        self.records
            .iter()
            .filter(|(_, record)| record.status == status)
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Number of populated records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if no cell has a record.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All populated coordinates, ascending.
    pub fn populated_coordinates(&self) -> impl Iterator<Item = Coordinate> + '_ {
        self.records.keys().copied()
    }

    /// Counts of populated records by status.
    pub fn summary(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for record in self.records.values() {
            counts.increment(record.status);
        }
        counts
    }

    // --- mutation --------------------------------------------------------

    /// Merge updates into the store.
    ///
    /// Each update only overwrites the fields it supplies. Coordinates whose
    /// record is unchanged by the merge are not reported; a single
    /// notification is emitted when anything changed.
    pub fn apply_changes<I, U>(&mut self, updates: I) -> usize
    where
        I: IntoIterator<Item = (Coordinate, U)>,
        U: Into<CellUpdate>,
    {
        let mut changed = BTreeSet::new();

        for (coord, update) in updates {
            let update = update.into();
            match self.records.entry(coord) {
                Entry::Occupied(mut entry) => {
                    let merged = entry.get().merge(update);
                    if merged != *entry.get() {
                        entry.insert(merged);
                        changed.insert(coord);
                    }
                }
                Entry::Vacant(entry) => {
                    let merged = CellRecord::default().merge(update);
                    if !merged.is_default() {
                        entry.insert(merged);
                        changed.insert(coord);
                    }
                }
            }
        }

        let count = changed.len();
        tracing::debug!(changed = count, "applied cell changes");
        self.listeners.emit(ChangeKind::Updated, changed);
        count
    }

    /// Like [`apply_changes`](Self::apply_changes), treating `None` as no updates.
    pub fn apply_optional<I, U>(&mut self, updates: Option<I>) -> usize
    where
        I: IntoIterator<Item = (Coordinate, U)>,
        U: Into<CellUpdate>,
    {
        match updates {
            Some(updates) => self.apply_changes(updates),
            None => 0,
        }
    }

    /// Remove every record.
    pub fn reset_all(&mut self) -> usize {
        let removed: BTreeSet<Coordinate> = std::mem::take(&mut self.records).into_keys().collect();
        self.finish_reset(removed)
    }

    /// Remove one cell's record.
    pub fn reset_cell(&mut self, coord: impl Into<Coordinate>) -> usize {
        let coord = coord.into();
        let removed: BTreeSet<Coordinate> = self
            .records
            .remove(&coord)
            .map(|_| coord)
            .into_iter()
            .collect();
        self.finish_reset(removed)
    }

    /// Remove every record in the given rows.
    pub fn reset_rows<I>(&mut self, rows: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        let rows: BTreeSet<usize> = rows.into_iter().collect();
        let removed: BTreeSet<Coordinate> = self
            .records
            .keys()
            .filter(|coord| rows.contains(&coord.row))
            .copied()
            .collect();
        for coord in &removed {
            self.records.remove(coord);
        }
        self.finish_reset(removed)
    }

    fn finish_reset(&mut self, removed: BTreeSet<Coordinate>) -> usize {
        let count = removed.len();
        tracing::debug!(removed = count, "reset cell records");
        self.listeners.emit(ChangeKind::Reset, removed);
        count
    }

    // --- schema ----------------------------------------------------------

    /// Rebuild the column-name to index map. Records are not touched.
    ///
    /// Returns `true` when the ordered column list differs from the previous
    /// one; the schema version is bumped in that case. Callers should follow a
    /// changed schema with whatever resets their structural edit requires.
    pub fn refresh_schema<I, S>(&mut self, column_names: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut columns = IndexMap::new();
        for (index, name) in column_names.into_iter().enumerate() {
            let name = name.into();
            if columns.contains_key(&name) {
                tracing::warn!(column = %name, index, "duplicate column name; keeping first index");
                continue;
            }
            columns.insert(name, index);
        }

        let changed = !columns.iter().eq(self.columns.iter());
        if changed {
            self.schema_version += 1;
            tracing::debug!(
                columns = columns.len(),
                version = self.schema_version,
                "column map rebuilt"
            );
        }
        self.columns = columns;
        changed
    }

    /// Rebuild the column map from a table snapshot's headers.
    pub fn refresh_schema_from(&mut self, table: &DataTable) -> bool {
        self.refresh_schema(table.headers.iter().cloned())
    }

    /// Index of a column by name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.get(name).copied()
    }

    /// Name of the column at `index`.
    pub fn column_name(&self, index: usize) -> Option<&str> {
        self.columns
            .iter()
            .find(|(_, i)| **i == index)
            .map(|(name, _)| name.as_str())
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Incremented each time `refresh_schema` sees a different column list.
    pub fn schema_version(&self) -> u64 {
        self.schema_version
    }

    // --- listeners -------------------------------------------------------

    /// Register a listener for change notifications.
    pub fn subscribe(&mut self, listener: impl ChangeListener + 'static) -> ListenerId {
        self.listeners.add(Box::new(listener))
    }

    /// Register a channel listener and return its receiving end.
    pub fn subscribe_channel(&mut self) -> UnboundedReceiver<ChangeNotification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.subscribe(ChannelListener(tx));
        rx
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }

    pub(crate) fn emit(&mut self, kind: ChangeKind, coordinates: BTreeSet<Coordinate>) {
        self.listeners.emit(kind, coordinates);
    }
}

impl fmt::Debug for StateStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StateStore")
            .field("records", &self.records.len())
            .field("columns", &self.columns.len())
            .field("schema_version", &self.schema_version)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
