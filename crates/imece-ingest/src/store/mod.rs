//! Record store seam
//!
//! The pipeline depends only on the [`RecordStore`] contract, never on a
//! specific storage technology. [`MemoryStore`] backs dry runs and tests;
//! the Postgres store lives behind the `database` feature.

pub mod memory;
#[cfg(feature = "database")]
pub mod postgres;

pub use memory::MemoryStore;
#[cfg(feature = "database")]
pub use postgres::PgStore;

use crate::normalize::Beneficiary;
use async_trait::async_trait;

/// Errors a store can raise for one batch
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("bulk insert rejected: {0}")]
    Rejected(String),

    #[cfg(feature = "database")]
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Abstract persistence collaborator accepting bulk inserts
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert a batch of records into `table`
    ///
    /// Returns the store-reported insert count, or `None` when the backend
    /// does not report one; the committer then falls back to the batch
    /// length. An `Err` rejects the batch wholesale.
    async fn insert_many(
        &self,
        table: &str,
        records: &[Beneficiary],
    ) -> Result<Option<usize>, StoreError>;
}
