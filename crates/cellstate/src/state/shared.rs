//! A store shared between async tasks.

use std::sync::Arc;

use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::mpsc::UnboundedReceiver;

use super::cell::{CellRecord, CellStatus, CellUpdate, Coordinate, CorrectionSuggestion};
use super::notify::ChangeNotification;
use super::snapshot::StoreSnapshot;
use super::store::StateStore;
use crate::correction::{CorrectionAdapter, CorrectionPassReport};
use crate::validation::{ValidationAdapter, ValidationPassReport, ValidationResultSet};

/// Cloneable handle to a [`StateStore`] behind an async read-write lock.
///
/// Producers on separate tasks (a validator and a corrector, say) go through
/// the write lock, so each pass reads and merges against the state left by
/// the previous one.
#[derive(Clone, Default)]
pub struct SharedStore {
    inner: Arc<RwLock<StateStore>>,
}

impl SharedStore {
    /// Wrap a store.
    pub fn new(store: StateStore) -> Self {
        Self {
            inner: Arc::new(RwLock::new(store)),
        }
    }

    /// Lock for reading.
    pub async fn read(&self) -> RwLockReadGuard<'_, StateStore> {
        self.inner.read().await
    }

    /// Lock for writing.
    pub async fn write(&self) -> RwLockWriteGuard<'_, StateStore> {
        self.inner.write().await
    }

    /// Run a validation pass under the write lock.
    pub async fn apply_validation(
        &self,
        adapter: &ValidationAdapter,
        results: &ValidationResultSet,
    ) -> ValidationPassReport {
        let mut store = self.inner.write().await;
        adapter.apply(&mut store, results)
    }

    /// Run a correction pass under the write lock.
    pub async fn apply_corrections<I>(&self, suggestions: I) -> CorrectionPassReport
    where
        I: IntoIterator<Item = (Coordinate, Vec<CorrectionSuggestion>)>,
    {
        let mut store = self.inner.write().await;
        CorrectionAdapter::new().apply(&mut store, suggestions)
    }

    /// Apply raw updates.
    pub async fn apply_changes<I, U>(&self, updates: I) -> usize
    where
        I: IntoIterator<Item = (Coordinate, U)>,
        U: Into<CellUpdate>,
    {
        self.inner.write().await.apply_changes(updates)
    }

    /// Forget every record in the given rows.
    pub async fn reset_rows<I>(&self, rows: I) -> usize
    where
        I: IntoIterator<Item = usize>,
    {
        self.inner.write().await.reset_rows(rows)
    }

    /// Forget one cell.
    pub async fn reset_cell(&self, coord: impl Into<Coordinate>) -> usize {
        self.inner.write().await.reset_cell(coord)
    }

    /// Status of a cell, `Normal` when it has no record.
    pub async fn status(&self, coord: impl Into<Coordinate>) -> CellStatus {
        self.inner.read().await.get_status(coord)
    }

    /// Copy of a cell's record, if any.
    pub async fn record(&self, coord: impl Into<Coordinate>) -> Option<CellRecord> {
        self.inner.read().await.get_record(coord)
    }

    /// Capture the current state.
    pub async fn snapshot(&self) -> StoreSnapshot {
        self.inner.read().await.snapshot()
    }

    /// Register a channel listener on the wrapped store.
    pub async fn subscribe_channel(&self) -> UnboundedReceiver<ChangeNotification> {
        self.inner.write().await.subscribe_channel()
    }
}

impl From<StateStore> for SharedStore {
    fn from(store: StateStore) -> Self {
        Self::new(store)
    }
}

impl std::fmt::Debug for SharedStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedStore")
            .field("strong_count", &Arc::strong_count(&self.inner))
            .finish()
    }
}
