//! Chunked row processing with progress reporting.

use std::ops::Range;
use std::sync::Arc;

use tracing::Instrument;

use super::progress::{CancellationFlag, ProgressTracker};
use crate::config::BatchConfig;
use crate::error::{CellStateError, Result};

/// Processes `0..total_rows` in chunks, yielding control between chunks.
///
/// Results come back in row order. Progress is reported as `(0, total)`
/// first, every `progress_interval` rows and at each chunk boundary in
/// between, and `(total, total)` last.
#[derive(Clone, Default)]
pub struct BatchRunner {
    config: BatchConfig,
    yield_hook: Option<Arc<dyn Fn() + Send + Sync>>,
}

impl std::fmt::Debug for BatchRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BatchRunner")
            .field("config", &self.config)
            .field("yield_hook", &self.yield_hook.is_some())
            .finish()
    }
}

impl BatchRunner {
    /// Create a runner with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a runner from batch settings.
    pub fn with_config(config: BatchConfig) -> Self {
        Self {
            config,
            yield_hook: None,
        }
    }

    /// Set the chunk size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    /// Set the number of rows between progress reports.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.config.progress_interval = interval;
        self
    }

    /// Run `hook` between chunks of a synchronous run (e.g. to pump an event loop).
    pub fn with_yield_hook(mut self, hook: impl Fn() + Send + Sync + 'static) -> Self {
        self.yield_hook = Some(Arc::new(hook));
        self
    }

    /// Current settings.
    pub fn config(&self) -> &BatchConfig {
        &self.config
    }

    /// Process every row synchronously.
    pub fn run<T, F, P>(&self, mut process_row: F, total_rows: usize, mut on_progress: P) -> Vec<T>
    where
        F: FnMut(usize) -> T,
        P: FnMut(usize, usize),
    {
        let batch_size = self.effective_batch_size();
        let span = tracing::debug_span!("batch_run", total_rows, batch_size);
        let _enter = span.enter();

        let mut results = Vec::with_capacity(total_rows);
        let mut tracker =
            ProgressTracker::start(total_rows, self.config.progress_interval, &mut on_progress);

        for chunk in chunk_ranges(total_rows, batch_size) {
            let end = chunk.end;
            process_chunk(chunk, &mut process_row, &mut results, &mut tracker);
            if end < total_rows {
                if let Some(hook) = &self.yield_hook {
                    hook();
                }
            }
        }

        tracker.finish();
        tracing::debug!(processed = results.len(), "batch run complete");
        results
    }

    /// Process every row, yielding to the tokio scheduler between chunks.
    pub async fn run_async<T, F, P>(
        &self,
        mut process_row: F,
        total_rows: usize,
        mut on_progress: P,
    ) -> Vec<T>
    where
        F: FnMut(usize) -> T,
        P: FnMut(usize, usize),
    {
        let batch_size = self.effective_batch_size();
        let interval = self.config.progress_interval;
        let span = tracing::debug_span!("batch_run_async", total_rows, batch_size);

        async move {
            let mut results = Vec::with_capacity(total_rows);
            let mut tracker = ProgressTracker::start(total_rows, interval, &mut on_progress);

            for chunk in chunk_ranges(total_rows, batch_size) {
                let end = chunk.end;
                process_chunk(chunk, &mut process_row, &mut results, &mut tracker);
                if end < total_rows {
                    tokio::task::yield_now().await;
                }
            }

            tracker.finish();
            tracing::debug!(processed = results.len(), "batch run complete");
            results
        }
        .instrument(span)
        .await
    }

    /// Process rows until done or until `cancel` is set.
    ///
    /// The flag is checked before each chunk. A cancelled run returns
    /// [`CellStateError::Cancelled`] and never reports `(total, total)`.
    pub fn run_cancellable<T, F, P>(
        &self,
        mut process_row: F,
        total_rows: usize,
        mut on_progress: P,
        cancel: &CancellationFlag,
    ) -> Result<Vec<T>>
    where
        F: FnMut(usize) -> T,
        P: FnMut(usize, usize),
    {
        let batch_size = self.effective_batch_size();
        let span = tracing::debug_span!("batch_run_cancellable", total_rows, batch_size);
        let _enter = span.enter();

        let mut results = Vec::with_capacity(total_rows);
        let mut tracker =
            ProgressTracker::start(total_rows, self.config.progress_interval, &mut on_progress);

        for chunk in chunk_ranges(total_rows, batch_size) {
            if cancel.is_cancelled() {
                tracing::info!(processed = results.len(), total_rows, "batch run cancelled");
                return Err(CellStateError::Cancelled {
                    processed: results.len(),
                    total: total_rows,
                });
            }
            let end = chunk.end;
            process_chunk(chunk, &mut process_row, &mut results, &mut tracker);
            if end < total_rows {
                if let Some(hook) = &self.yield_hook {
                    hook();
                }
            }
        }

        tracker.finish();
        Ok(results)
    }

    fn effective_batch_size(&self) -> usize {
        if self.config.batch_size == 0 {
            tracing::warn!("batch_size of 0 treated as 1");
            1
        } else {
            self.config.batch_size
        }
    }
}

/// Run rows `0..total_rows` in chunks of `batch_size` with default progress cadence.
pub fn run_batches<T, F, P>(
    process_row: F,
    total_rows: usize,
    batch_size: usize,
    on_progress: P,
) -> Vec<T>
where
    F: FnMut(usize) -> T,
    P: FnMut(usize, usize),
{
    BatchRunner::new()
        .with_batch_size(batch_size)
        .run(process_row, total_rows, on_progress)
}

fn chunk_ranges(total_rows: usize, batch_size: usize) -> impl Iterator<Item = Range<usize>> {
    (0..total_rows)
        .step_by(batch_size)
        .map(move |start| start..(start + batch_size).min(total_rows))
}

fn process_chunk<T, F>(
    chunk: Range<usize>,
    process_row: &mut F,
    results: &mut Vec<T>,
    tracker: &mut ProgressTracker<'_>,
) where
    F: FnMut(usize) -> T,
{
    tracing::trace!(start = chunk.start, end = chunk.end, "processing chunk");
    let end = chunk.end;
    for row in chunk {
        results.push(process_row(row));
        tracker.row_done(row + 1);
    }
    tracker.chunk_done(end);
}
