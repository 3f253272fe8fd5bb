//! Imece Bulk Ingestion Library
//!
//! Takes a user-supplied delimited text file describing beneficiaries, maps
//! its arbitrary (possibly Turkish) column headers onto the canonical
//! beneficiary schema, normalizes heterogeneous field formats (principally
//! dates), validates rows, and commits the survivors to a record store in
//! bounded batches. Row and batch failures never abort a run; everything is
//! accounted for in the [`ImportReport`].
//!
//! Pipeline stages, in dependency order:
//!
//! - **intake**: raw bytes -> headers + raw row maps
//! - **mapping**: canonical field -> source header (exact + folded match)
//! - **normalize**: raw row -> typed [`Beneficiary`] record
//! - **validate**: accept or reject each record with a reason
//! - **commit**: sequential, bounded batches into a [`store::RecordStore`]
//!
//! # Example
//!
//! ```no_run
//! use imece_ingest::store::MemoryStore;
//! use imece_ingest::{ImportConfig, ImportPipeline};
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let bytes = std::fs::read("beneficiaries.csv")?;
//!     let pipeline = ImportPipeline::new(MemoryStore::new(), ImportConfig::default());
//!     let report = pipeline.run(&bytes, &CancellationToken::new()).await?;
//!     println!("inserted {} of {} rows", report.inserted_rows, report.total_rows);
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commit;
pub mod config;
pub mod fields;
pub mod intake;
pub mod mapping;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod validate;

// Re-export main types
pub use cli::Cli;
pub use commit::BatchCommitter;
pub use config::ImportConfig;
pub use fields::BeneficiaryField;
pub use intake::{Delimiter, ParsedFile, RawRecord};
pub use mapping::HeaderMapping;
pub use normalize::Beneficiary;
pub use pipeline::ImportPipeline;
pub use report::ImportReport;
pub use validate::{RejectReason, RowOutcome};

// Batch size constants
pub const DEFAULT_CHUNK_SIZE: usize = 500;
pub const MAX_DISPLAYED_REJECTIONS: usize = 200;

/// Result type for import operations
pub type Result<T> = std::result::Result<T, ImportError>;

/// Fatal errors for an import run
///
/// Only structural input failures abort a run. Row-level irregularities are
/// absorbed during intake, rejected rows are tallied by the validator, and
/// failed batches are skipped by the committer.
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("Decode error: input is not valid UTF-8: {0}")]
    Decode(#[from] std::str::Utf8Error),

    #[error("Parse error: {0}")]
    Parse(#[from] csv::Error),
}
