//! Correction suggestions and their translation into cell states.

mod adapter;

pub use adapter::{CorrectionAdapter, CorrectionPassReport};
