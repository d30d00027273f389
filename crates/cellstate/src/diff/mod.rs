//! Change detection between table snapshots.
//!
//! Callers diff the table before and after a load or mass edit and use the
//! result to decide which rows to re-validate. Nothing here touches a
//! [`crate::StateStore`].

mod table;

pub use table::{TableDiff, diff_tables};
