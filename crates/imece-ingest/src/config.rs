//! Import run configuration
//!
//! Passed explicitly into the pipeline per run; nothing here is cached or
//! shared across runs.

use crate::intake::Delimiter;
use crate::{DEFAULT_CHUNK_SIZE, MAX_DISPLAYED_REJECTIONS};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportConfig {
    /// Target table for committed records
    pub table: String,

    /// Explicit delimiter; `None` auto-detects from the first line
    pub delimiter: Option<Delimiter>,

    /// Maximum records per committed batch (a zero is treated as 1)
    pub chunk_size: usize,

    /// Cap on the displayed rejection reason list; counts stay exact
    pub max_displayed_rejections: usize,

    /// Per-batch timeout; an elapsed timeout counts as that batch failing
    pub batch_timeout: Duration,
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self {
            table: "beneficiaries".to_string(),
            delimiter: None,
            chunk_size: DEFAULT_CHUNK_SIZE,
            max_displayed_rejections: MAX_DISPLAYED_REJECTIONS,
            batch_timeout: Duration::from_secs(60),
        }
    }
}

impl ImportConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    pub fn with_max_displayed_rejections(mut self, cap: usize) -> Self {
        self.max_displayed_rejections = cap;
        self
    }

    pub fn with_batch_timeout(mut self, timeout: Duration) -> Self {
        self.batch_timeout = timeout;
        self
    }
}
