//! Import pipeline integration tests
//!
//! Full runs over realistic delimited files against the in-memory store; no
//! external services are required.

use async_trait::async_trait;
use imece_ingest::store::{MemoryStore, RecordStore, StoreError};
use imece_ingest::{Beneficiary, ImportConfig, ImportPipeline};
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio_util::sync::CancellationToken;

/// A realistic export: semicolon delimited, Turkish headers, a blank filler
/// line, one bad email, one row missing both names
fn mixed_sample_csv() -> String {
    [
        "Ad;Soyad;Doğum Tarihi;E-posta;Şehir",
        "Ayşe;Yılmaz;01.02.1990;ayse@example.org;İstanbul",
        "Mehmet;Demir;1985-07-15;;Ankara",
        ";;;;",
        "Zeynep;Kaya;doksan;zeynep.kaya.org;İzmir",
        ";;31.12.2001;;Bursa",
        "",
    ]
    .join("\n")
}

fn names_only_csv(rows: usize) -> String {
    let mut csv = String::from("Ad,Soyad\n");
    for i in 0..rows {
        csv.push_str(&format!("Kişi-{},Aile-{}\n", i, i));
    }
    csv
}

fn nameless_csv(rows: usize) -> String {
    let mut csv = String::from("Ad,Şehir\n");
    for i in 0..rows {
        csv.push_str(&format!(",Şehir-{}\n", i));
    }
    csv
}

#[tokio::test]
async fn test_mixed_file_end_to_end() {
    let pipeline = ImportPipeline::new(MemoryStore::new(), ImportConfig::default());
    let report = pipeline
        .run(mixed_sample_csv().as_bytes(), &CancellationToken::new())
        .await
        .expect("run should succeed");

    // the all-blank line is a formatting artifact, not a row
    assert_eq!(report.total_rows, 4);
    assert_eq!(report.validated_rows, 2);
    assert_eq!(report.rejected_rows, 2);
    assert_eq!(report.inserted_rows, 2);
    assert_eq!(report.progress, 100);

    assert_eq!(report.rejection_reasons.len(), 2);
    assert!(report.rejection_reasons[0].contains("row 3"));
    assert!(report.rejection_reasons[0].contains("zeynep.kaya.org"));
    assert!(report.rejection_reasons[1].contains("row 4"));
    assert!(report.rejection_reasons[1].contains("identity fields missing"));

    let stored = pipeline.store().rows("beneficiaries").await;
    assert_eq!(stored.len(), 2);
    assert_eq!(stored[0].first_name.as_deref(), Some("Ayşe"));
    assert_eq!(stored[0].birth_date.as_deref(), Some("1990-02-01"));
    assert_eq!(stored[0].city.as_deref(), Some("İstanbul"));
    assert_eq!(stored[1].birth_date.as_deref(), Some("1985-07-15"));
    assert_eq!(stored[1].email, None);
}

#[tokio::test]
async fn test_folded_headers_map_through_whole_run() {
    let csv = "AD;SOYAD;DOGUM TARIHI\nFatma;Şahin;5.3.2024\n";
    let pipeline = ImportPipeline::new(MemoryStore::new(), ImportConfig::default());

    let report = pipeline
        .run(csv.as_bytes(), &CancellationToken::new())
        .await
        .expect("run should succeed");

    assert_eq!(report.inserted_rows, 1);
    let stored = pipeline.store().rows("beneficiaries").await;
    assert_eq!(stored[0].last_name.as_deref(), Some("Şahin"));
    assert_eq!(stored[0].birth_date.as_deref(), Some("2024-03-05"));
}

#[tokio::test]
async fn test_batches_partition_as_ceil_of_rows_over_chunk() {
    let config = ImportConfig::new().with_chunk_size(50);
    let pipeline = ImportPipeline::new(MemoryStore::new(), config);

    let report = pipeline
        .run(names_only_csv(105).as_bytes(), &CancellationToken::new())
        .await
        .expect("run should succeed");

    assert_eq!(report.validated_rows, 105);
    assert_eq!(report.inserted_rows, 105);

    let batch_lines: Vec<&String> = report
        .log
        .iter()
        .filter(|line| line.contains(": inserted"))
        .collect();
    assert_eq!(batch_lines.len(), 3);
    assert!(batch_lines[0].contains("batch 1 / 3: inserted 50"));
    assert!(batch_lines[2].contains("batch 3 / 3: inserted 5"));

    assert_eq!(pipeline.store().row_count("beneficiaries").await, 105);
}

#[tokio::test]
async fn test_rejection_display_list_caps_at_configured_limit() {
    let pipeline = ImportPipeline::new(MemoryStore::new(), ImportConfig::default());

    let report = pipeline
        .run(nameless_csv(210).as_bytes(), &CancellationToken::new())
        .await
        .expect("run should succeed");

    // true count stays exact while the display list stops at the cap
    assert_eq!(report.rejected_rows, 210);
    assert_eq!(report.rejection_reasons.len(), 200);
    assert_eq!(report.inserted_rows, 0);
}

/// Rejects one specific batch wholesale, like a constraint violation would
struct RejectingStore {
    inner: MemoryStore,
    reject_call: usize,
    calls: AtomicUsize,
}

#[async_trait]
impl RecordStore for RejectingStore {
    async fn insert_many(
        &self,
        table: &str,
        records: &[Beneficiary],
    ) -> Result<Option<usize>, StoreError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == self.reject_call {
            return Err(StoreError::Rejected(
                "value too long for type character varying".to_string(),
            ));
        }
        self.inner.insert_many(table, records).await
    }
}

#[tokio::test]
async fn test_wholesale_batch_rejection_skips_and_continues() {
    let store = RejectingStore {
        inner: MemoryStore::new(),
        reject_call: 0,
        calls: AtomicUsize::new(0),
    };
    let config = ImportConfig::new().with_chunk_size(4);
    let pipeline = ImportPipeline::new(store, config);

    let report = pipeline
        .run(names_only_csv(10).as_bytes(), &CancellationToken::new())
        .await
        .expect("run should succeed");

    // first batch of 4 lost, remaining 6 land; invariant holds throughout
    assert_eq!(report.validated_rows, 10);
    assert_eq!(report.inserted_rows, 6);
    assert!(report.inserted_rows <= report.validated_rows);
    assert!(report.validated_rows <= report.total_rows);
    assert_eq!(report.progress, 100);
    assert!(report
        .log
        .iter()
        .any(|line| line.contains("batch 1 / 3 failed, skipping")));

    assert_eq!(pipeline.store().inner.row_count("beneficiaries").await, 6);
    assert_eq!(pipeline.store().calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_header_only_file_reports_zeros() {
    let pipeline = ImportPipeline::new(MemoryStore::new(), ImportConfig::default());

    let report = pipeline
        .run(b"Ad,Soyad,E-posta\n", &CancellationToken::new())
        .await
        .expect("run should succeed");

    assert_eq!(report.total_rows, 0);
    assert_eq!(report.validated_rows, 0);
    assert_eq!(report.rejected_rows, 0);
    assert_eq!(report.inserted_rows, 0);
    assert_eq!(report.progress, 100);
}

#[tokio::test]
async fn test_empty_file_reports_zeros() {
    let pipeline = ImportPipeline::new(MemoryStore::new(), ImportConfig::default());

    let report = pipeline
        .run(b"", &CancellationToken::new())
        .await
        .expect("run should succeed");

    assert_eq!(report.total_rows, 0);
    assert_eq!(report.inserted_rows, 0);
    assert_eq!(report.progress, 100);
}

#[tokio::test]
async fn test_pipe_delimited_export() {
    let csv = "Ad|Soyad|IBAN\nAyşe|Yılmaz|TR330006100519786457841326\n";
    let pipeline = ImportPipeline::new(MemoryStore::new(), ImportConfig::default());

    let report = pipeline
        .run(csv.as_bytes(), &CancellationToken::new())
        .await
        .expect("run should succeed");

    assert_eq!(report.inserted_rows, 1);
    let stored = pipeline.store().rows("beneficiaries").await;
    assert_eq!(
        stored[0].iban.as_deref(),
        Some("TR330006100519786457841326")
    );
}
