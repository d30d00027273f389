//! Per-cell state: records, the store, and change notifications.
//!
//! # Usage
//!
//! ```
//! use cellstate::state::{CellRecord, CellStatus, Coordinate, StateStore};
//!
//! let mut store = StateStore::with_columns(["name", "age"]);
//! let mut changes = store.subscribe_channel();
//!
//! store.apply_changes([(
//!     Coordinate::new(0, 1),
//!     CellRecord::new(CellStatus::Invalid).with_detail("age must be a number"),
//! )]);
//!
//! assert_eq!(store.get_status(Coordinate::new(0, 1)), CellStatus::Invalid);
//! assert_eq!(store.get_status(Coordinate::new(9, 9)), CellStatus::Normal);
//! assert_eq!(changes.try_recv().unwrap().len(), 1);
//! ```

mod cell;
mod notify;
mod shared;
mod snapshot;
mod store;

pub use cell::{CellRecord, CellStatus, CellUpdate, Coordinate, CorrectionSuggestion};
pub use notify::{ChangeKind, ChangeListener, ChangeNotification, ChannelListener, ListenerId};
pub use shared::SharedStore;
pub use snapshot::{SNAPSHOT_VERSION, SnapshotCell, StoreSnapshot};
pub use store::{StateStore, StatusCounts};
