//! In-memory table snapshots.

mod source;

pub use source::DataTable;
