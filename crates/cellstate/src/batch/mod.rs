//! Chunked processing of large row counts.
//!
//! Work is split into fixed-size chunks so an interactive host can stay
//! responsive: the synchronous runner calls an optional yield hook between
//! chunks, the async runner yields to the tokio scheduler.

mod progress;
mod runner;

pub use progress::{BatchProgress, CancellationFlag};
pub use runner::{BatchRunner, run_batches};
