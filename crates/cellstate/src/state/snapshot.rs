//! Serializable store snapshots.
//!
//! Snapshots let a host stash and reload cell state (for example across a
//! table reload that keeps identity) without the store doing any I/O itself.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cell::{CellRecord, Coordinate};
use super::notify::ChangeKind;
use super::store::StateStore;
use crate::error::{CellStateError, Result};

/// Current version of the snapshot format.
pub const SNAPSHOT_VERSION: &str = "1.0.0";

/// One populated cell in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotCell {
    #[serde(flatten)]
    pub coordinate: Coordinate,
    pub record: CellRecord,
}

/// Point-in-time copy of a store's records and column map.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Version of the snapshot format.
    pub snapshot_version: String,
    /// When the snapshot was taken.
    pub taken_at: DateTime<Utc>,
    /// Column names in schema order.
    pub columns: Vec<String>,
    /// Populated cells, ascending by coordinate.
    pub cells: Vec<SnapshotCell>,
}

impl StoreSnapshot {
    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a snapshot from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: StoreSnapshot = serde_json::from_str(json)?;
        snapshot.check()?;
        Ok(snapshot)
    }

    fn check(&self) -> Result<()> {
        let major = self.snapshot_version.split('.').next().unwrap_or_default();
        if major != "1" {
            return Err(CellStateError::Snapshot(format!(
                "unsupported snapshot version '{}'",
                self.snapshot_version
            )));
        }

        let mut seen = BTreeSet::new();
        for cell in &self.cells {
            if !seen.insert(cell.coordinate) {
                return Err(CellStateError::Snapshot(format!(
                    "duplicate cell {}",
                    cell.coordinate
                )));
            }
        }
        Ok(())
    }
}

impl StateStore {
    /// Take a snapshot of every populated record and the column map.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            snapshot_version: SNAPSHOT_VERSION.to_string(),
            taken_at: Utc::now(),
            columns: self.columns.keys().cloned().collect(),
            cells: self
                .records
                .iter()
                .map(|(coordinate, record)| SnapshotCell {
                    coordinate: *coordinate,
                    record: record.clone(),
                })
                .collect(),
        }
    }

    /// Replace all records and the column map with a snapshot's contents.
    ///
    /// Emits one `Restored` notification covering every coordinate whose
    /// record differs before and after. Returns the number of restored cells.
    pub fn restore(&mut self, snapshot: StoreSnapshot) -> Result<usize> {
        snapshot.check()?;

        let mut touched: BTreeSet<Coordinate> = self.records.keys().copied().collect();
        let previous = std::mem::take(&mut self.records);

        for SnapshotCell { coordinate, record } in snapshot.cells {
            if previous.get(&coordinate) == Some(&record) {
                touched.remove(&coordinate);
            } else {
                touched.insert(coordinate);
            }
            self.records.insert(coordinate, record);
        }

        self.refresh_schema(snapshot.columns);

        let restored = self.records.len();
        tracing::debug!(restored, changed = touched.len(), "restored store snapshot");
        self.emit(ChangeKind::Restored, touched);
        Ok(restored)
    }
}
