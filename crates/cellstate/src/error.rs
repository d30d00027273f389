//! Error types for the cellstate library.
//!
//! Store and adapter operations are total and never return these; errors only
//! surface when decoding configuration or snapshots and when a cancellable
//! batch run is stopped.

use thiserror::Error;

/// Main error type for cellstate operations.
#[derive(Debug, Error)]
pub enum CellStateError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A store snapshot could not be restored.
    #[error("Snapshot error: {0}")]
    Snapshot(String),

    /// A cancellable batch run was stopped at a chunk boundary.
    #[error("Batch cancelled after {processed} of {total} rows")]
    Cancelled { processed: usize, total: usize },
}

/// Result type alias for cellstate operations.
pub type Result<T> = std::result::Result<T, CellStateError>;
