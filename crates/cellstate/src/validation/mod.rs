//! Validation results and their translation into cell states.
//!
//! The validator itself lives outside this crate. It hands over a wide
//! result set (`{column}_status` / `{column}_message` per row), which
//! [`ValidationAdapter`] turns into one store update.

mod adapter;
mod result;
mod status;

pub use adapter::{ValidationAdapter, ValidationPassReport};
pub use result::{ResultRow, ValidationResultSet};
pub use status::{StatusReading, ValidationStatus};
