//! Progress reporting and cancellation for batch runs.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// A `(processed, total)` progress point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchProgress {
    pub processed: usize,
    pub total: usize,
}

impl BatchProgress {
    /// Fraction complete (0.0-1.0). An empty run counts as complete.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        self.processed as f64 / self.total as f64
    }

    /// Check if every row has been processed.
    pub fn is_complete(&self) -> bool {
        self.processed >= self.total
    }
}

/// Shared flag checked by cancellable runs at every chunk boundary.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    /// Create an unset flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives the progress callback for one run.
///
/// Reports `(0, total)` first and `(total, total)` last; in between, each
/// report strictly increases `processed` and stays below `total`.
pub(crate) struct ProgressTracker<'a> {
    total: usize,
    interval: usize,
    last_reported: usize,
    on_progress: &'a mut dyn FnMut(usize, usize),
}

impl<'a> ProgressTracker<'a> {
    pub(crate) fn start(
        total: usize,
        interval: usize,
        on_progress: &'a mut dyn FnMut(usize, usize),
    ) -> Self {
        on_progress(0, total);
        Self {
            total,
            interval: interval.max(1),
            last_reported: 0,
            on_progress,
        }
    }

    /// Called after each row; reports on the configured cadence.
    pub(crate) fn row_done(&mut self, processed: usize) {
        if processed % self.interval == 0 {
            self.report(processed);
        }
    }

    /// Called at each chunk boundary.
    pub(crate) fn chunk_done(&mut self, processed: usize) {
        self.report(processed);
    }

    pub(crate) fn finish(self) {
        (self.on_progress)(self.total, self.total);
    }

    fn report(&mut self, processed: usize) {
        if processed > self.last_reported && processed < self.total {
            (self.on_progress)(processed, self.total);
            self.last_reported = processed;
        }
    }
}
