//! Configuration for batch processing and validation field naming.

use serde::{Deserialize, Serialize};

use crate::error::{CellStateError, Result};

/// Default rows per batch chunk.
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Default rows between progress reports inside a chunk.
pub const DEFAULT_PROGRESS_INTERVAL: usize = 10;

/// Chunking and progress cadence for [`crate::batch::BatchRunner`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Rows per chunk; control is yielded between chunks.
    pub batch_size: usize,
    /// Rows between progress reports inside a chunk.
    pub progress_interval: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            progress_interval: DEFAULT_PROGRESS_INTERVAL,
        }
    }
}

impl BatchConfig {
    /// Set the batch size.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size;
        self
    }

    /// Set the progress interval.
    pub fn with_progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = interval;
        self
    }
}

/// Field naming used by the validator's wide result format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Suffix appended to a column name for its status field.
    pub status_suffix: String,
    /// Suffix appended to a column name for its message field.
    pub message_suffix: String,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            status_suffix: "_status".to_string(),
            message_suffix: "_message".to_string(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CellStateConfig {
    /// Batch runner settings.
    pub batch: BatchConfig,
    /// Validation result field naming.
    pub validation: ValidationConfig,
}

impl CellStateConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse configuration from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: CellStateConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Set the batch settings.
    pub fn with_batch(mut self, batch: BatchConfig) -> Self {
        self.batch = batch;
        self
    }

    /// Set the validation field naming.
    pub fn with_validation(mut self, validation: ValidationConfig) -> Self {
        self.validation = validation;
        self
    }

    /// Check settings that would otherwise silently misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.batch.batch_size == 0 {
            return Err(CellStateError::Config(
                "batch_size must be at least 1".to_string(),
            ));
        }
        if self.batch.progress_interval == 0 {
            return Err(CellStateError::Config(
                "progress_interval must be at least 1".to_string(),
            ));
        }
        if self.validation.status_suffix.is_empty() || self.validation.message_suffix.is_empty() {
            return Err(CellStateError::Config(
                "validation field suffixes must not be empty".to_string(),
            ));
        }
        if self.validation.status_suffix == self.validation.message_suffix {
            return Err(CellStateError::Config(
                "status and message suffixes must differ".to_string(),
            ));
        }
        Ok(())
    }
}
