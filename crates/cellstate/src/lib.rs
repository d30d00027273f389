//! Cellstate: per-cell status tracking for tabular data editors.
//!
//! A grid view needs to know, for every cell, whether an external validator
//! flagged it, what the message was, and which corrections a suggestion
//! engine proposed. Cellstate keeps that state sparse, merges partial
//! updates from independent producers without clobbering each other's
//! fields, and emits one batched change notification per mutation.
//!
//! # Core Principles
//!
//! - **Sparse**: cells without a record read as `Normal`
//! - **Non-clobbering**: validation keeps suggestions; corrections keep messages
//! - **Batched**: one notification per mutating call, none for no-ops
//!
//! # Example
//!
//! ```
//! use cellstate::{
//!     CellStatus, CorrectionAdapter, CorrectionSuggestion, Coordinate, StateStore,
//!     ValidationAdapter, ValidationResultSet, ValidationStatus,
//! };
//!
//! let mut store = StateStore::with_columns(["name", "age"]);
//!
//! let results = ValidationResultSet::new()
//!     .with_cell(0, "age", ValidationStatus::Invalid, "bad value");
//! ValidationAdapter::new(["age"]).apply(&mut store, &results);
//!
//! CorrectionAdapter::new().apply(
//!     &mut store,
//!     [(Coordinate::new(0, 1), vec![CorrectionSuggestion::new("bad value", "good value")])],
//! );
//!
//! let record = store.get_record(Coordinate::new(0, 1)).unwrap();
//! assert_eq!(record.status, CellStatus::Correctable);
//! assert_eq!(record.detail.as_deref(), Some("bad value"));
//! ```

pub mod batch;
pub mod config;
pub mod correction;
pub mod diff;
pub mod error;
pub mod input;
pub mod state;
pub mod validation;

pub use batch::{BatchProgress, BatchRunner, CancellationFlag, run_batches};
pub use config::{BatchConfig, CellStateConfig, ValidationConfig};
pub use correction::{CorrectionAdapter, CorrectionPassReport};
pub use diff::{TableDiff, diff_tables};
pub use error::{CellStateError, Result};
pub use input::DataTable;
pub use state::{
    CellRecord, CellStatus, CellUpdate, ChangeKind, ChangeListener, ChangeNotification,
    Coordinate, CorrectionSuggestion, SharedStore, StateStore, StoreSnapshot,
};
pub use validation::{
    ValidationAdapter, ValidationPassReport, ValidationResultSet, ValidationStatus,
};
