//! Import pipeline orchestration
//!
//! Wires intake, mapping, normalization, validation, and batch commit into
//! one sequential run per upload. State is exclusively owned by the active
//! run; callers wanting concurrent imports must serialize them.

use crate::commit::BatchCommitter;
use crate::config::ImportConfig;
use crate::intake::{self, RawRecord};
use crate::mapping::HeaderMapping;
use crate::normalize::{self, Beneficiary};
use crate::report::ImportReport;
use crate::store::RecordStore;
use crate::validate::{self, RowOutcome};
use crate::Result;
use imece_common::checksum::sha256_bytes;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// One upload session's pipeline over a record store
pub struct ImportPipeline<S: RecordStore> {
    store: S,
    config: ImportConfig,
}

impl<S: RecordStore> ImportPipeline<S> {
    pub fn new(store: S, config: ImportConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ImportConfig {
        &self.config
    }

    /// Parse uploaded bytes and run with the auto-detected header mapping
    pub async fn run(&self, bytes: &[u8], cancel: &CancellationToken) -> Result<ImportReport> {
        self.run_with_mapping(bytes, None, cancel).await
    }

    /// Parse uploaded bytes and run, with an explicit mapping when given
    ///
    /// The only fallible stage is intake; from there on every row failure
    /// is absorbed into the report.
    pub async fn run_with_mapping(
        &self,
        bytes: &[u8],
        mapping: Option<&HeaderMapping>,
        cancel: &CancellationToken,
    ) -> Result<ImportReport> {
        let checksum = sha256_bytes(bytes);
        info!("ingesting {} byte(s), sha256 {}", bytes.len(), checksum);

        let parsed = intake::parse(bytes, self.config.delimiter)?;
        info!(
            "parsed {} data row(s) across {} header(s) ({} delimited)",
            parsed.rows.len(),
            parsed.headers.len(),
            parsed.delimiter
        );

        let mut report = self
            .run_records(&parsed.headers, &parsed.rows, mapping, cancel)
            .await;
        report.source_checksum = Some(checksum);
        Ok(report)
    }

    /// Run the mapped stages over already-parsed rows
    ///
    /// Infallible: every row ends up counted in the report as validated or
    /// rejected, and commit failures only ever skip batches.
    pub async fn run_records(
        &self,
        headers: &[String],
        rows: &[RawRecord],
        mapping: Option<&HeaderMapping>,
        cancel: &CancellationToken,
    ) -> ImportReport {
        let mut report = ImportReport::new(rows.len(), self.config.max_displayed_rejections);

        report.push_log("Step 1/4: Mapping headers");
        let detected;
        let mapping = match mapping {
            Some(mapping) => mapping,
            None => {
                detected = HeaderMapping::detect(headers);
                &detected
            }
        };
        let unmapped = mapping.unmapped();
        if !unmapped.is_empty() {
            report.push_log(format!(
                "{} field(s) left unmapped: {}",
                unmapped.len(),
                unmapped
                    .iter()
                    .map(|field| field.as_str())
                    .collect::<Vec<_>>()
                    .join(", ")
            ));
        }

        report.push_log(format!("Step 2/4: Normalizing {} row(s)", rows.len()));
        let normalized: Vec<Beneficiary> = rows
            .iter()
            .map(|raw| normalize::normalize(raw, mapping))
            .collect();

        report.push_log("Step 3/4: Validating rows");
        let mut accepted = Vec::with_capacity(normalized.len());
        for (index, record) in normalized.into_iter().enumerate() {
            match validate::validate(record, index + 1) {
                RowOutcome::Accepted(record) => {
                    report.record_accepted();
                    accepted.push(record);
                }
                RowOutcome::Rejected(reason) => report.record_rejection(&reason),
            }
        }
        report.push_log(format!(
            "validated {} row(s), rejected {}",
            report.validated_rows, report.rejected_rows
        ));

        report.push_log(format!(
            "Step 4/4: Committing {} row(s) to {}",
            accepted.len(),
            self.config.table
        ));
        BatchCommitter::new(&self.store, &self.config)
            .commit(&accepted, &mut report, cancel)
            .await;

        report
    }
}
