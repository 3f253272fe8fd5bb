//! Batch commit: sequential bounded batches into the record store
//!
//! Batches go out one at a time to bound load on the store and keep
//! progress deterministic. A failed or timed-out batch is never retried and
//! never split for row-level recovery; it is logged with its index and the
//! run moves on. Cancellation is honored between batches.

use crate::config::ImportConfig;
use crate::normalize::Beneficiary;
use crate::report::ImportReport;
use crate::store::RecordStore;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct BatchCommitter<'a, S: RecordStore> {
    store: &'a S,
    config: &'a ImportConfig,
}

impl<'a, S: RecordStore> BatchCommitter<'a, S> {
    pub fn new(store: &'a S, config: &'a ImportConfig) -> Self {
        Self { store, config }
    }

    /// Submit accepted records in order, updating the report as batches land
    ///
    /// Progress advances over attempted rows whether or not their batch
    /// succeeded, so a run with failed batches still ends at 100.
    pub async fn commit(
        &self,
        accepted: &[Beneficiary],
        report: &mut ImportReport,
        cancel: &CancellationToken,
    ) {
        let total = accepted.len();
        if total == 0 {
            report.set_progress(0, 0);
            report.push_log("no accepted rows to commit");
            return;
        }

        // chunks(0) panics
        let chunk_size = self.config.chunk_size.max(1);
        let total_batches = (total + chunk_size - 1) / chunk_size;
        debug!(
            "committing {} row(s) in {} batch(es) of up to {}",
            total, total_batches, chunk_size
        );

        let mut processed = 0usize;
        for (index, batch) in accepted.chunks(chunk_size).enumerate() {
            if cancel.is_cancelled() {
                report.push_warning(format!(
                    "cancelled before batch {} / {}; {} row(s) not attempted",
                    index + 1,
                    total_batches,
                    total - processed
                ));
                break;
            }

            let attempt = timeout(
                self.config.batch_timeout,
                self.store.insert_many(&self.config.table, batch),
            )
            .await;

            match attempt {
                Ok(Ok(count)) => {
                    let inserted = count.unwrap_or(batch.len());
                    report.record_inserted(inserted);
                    report.push_log(format!(
                        "batch {} / {}: inserted {} row(s)",
                        index + 1,
                        total_batches,
                        inserted
                    ));
                }
                Ok(Err(err)) => {
                    report.push_warning(format!(
                        "batch {} / {} failed, skipping: {}",
                        index + 1,
                        total_batches,
                        err
                    ));
                }
                Err(_) => {
                    report.push_warning(format!(
                        "batch {} / {} timed out after {:?}, skipping",
                        index + 1,
                        total_batches,
                        self.config.batch_timeout
                    ));
                }
            }

            processed += batch.len();
            report.set_progress(processed, total);
        }
    }
}
