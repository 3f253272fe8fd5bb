//! Run-scoped ingestion report
//!
//! Single writer (the running pipeline), single reader (the caller). Counts
//! are always exact; only the displayed reason list is capped. The log is
//! append-only and mirrored to tracing.

use crate::validate::RejectReason;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

/// Aggregate outcome of one import run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,

    /// SHA-256 of the uploaded bytes, when the run started from a file
    pub source_checksum: Option<String>,

    pub total_rows: usize,
    pub validated_rows: usize,
    pub rejected_rows: usize,
    pub inserted_rows: usize,

    /// Floor percentage of accepted rows the committer has attempted
    pub progress: u8,

    /// First rejection reasons, capped for display; `rejected_rows` stays exact
    pub rejection_reasons: Vec<String>,

    /// Append-only run log
    pub log: Vec<String>,

    #[serde(skip)]
    max_displayed: usize,
}

impl ImportReport {
    pub fn new(total_rows: usize, max_displayed: usize) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            source_checksum: None,
            total_rows,
            validated_rows: 0,
            rejected_rows: 0,
            inserted_rows: 0,
            progress: 0,
            rejection_reasons: Vec::new(),
            log: Vec::new(),
            max_displayed,
        }
    }

    pub fn record_accepted(&mut self) {
        self.validated_rows += 1;
    }

    /// Count a rejection; the reason text is only kept below the display cap
    pub fn record_rejection(&mut self, reason: &RejectReason) {
        self.rejected_rows += 1;
        warn!(run_id = %self.run_id, "{}", reason);
        if self.rejection_reasons.len() < self.max_displayed {
            self.rejection_reasons.push(reason.to_string());
        }
    }

    pub fn record_inserted(&mut self, count: usize) {
        self.inserted_rows += count;
    }

    /// Update progress as `floor(processed / total * 100)`
    ///
    /// A run with nothing to commit reports 100 immediately.
    pub fn set_progress(&mut self, processed: usize, total: usize) {
        self.progress = if total == 0 {
            100
        } else {
            (processed * 100 / total) as u8
        };
    }

    /// Append a log line, mirrored to tracing at info level
    pub fn push_log(&mut self, line: impl Into<String>) {
        let line = line.into();
        info!(run_id = %self.run_id, "{}", line);
        self.log.push(line);
    }

    /// Append a log line, mirrored to tracing at warn level
    pub fn push_warning(&mut self, line: impl Into<String>) {
        let line = line.into();
        warn!(run_id = %self.run_id, "{}", line);
        self.log.push(line);
    }

    /// One-line human summary for CLI output
    pub fn summary(&self) -> String {
        format!(
            "{} row(s): {} validated, {} rejected, {} inserted",
            self.total_rows, self.validated_rows, self.rejected_rows, self.inserted_rows
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejection_list_is_capped_but_count_exact() {
        let mut report = ImportReport::new(10, 2);
        for row in 1..=5 {
            report.record_rejection(&RejectReason::MissingIdentity { row });
        }

        assert_eq!(report.rejected_rows, 5);
        assert_eq!(report.rejection_reasons.len(), 2);
        assert!(report.rejection_reasons[0].contains("row 1"));
        assert!(report.rejection_reasons[1].contains("row 2"));
    }

    #[test]
    fn test_progress_floors() {
        let mut report = ImportReport::new(3, 200);
        report.set_progress(1, 3);
        assert_eq!(report.progress, 33);
        report.set_progress(2, 3);
        assert_eq!(report.progress, 66);
        report.set_progress(3, 3);
        assert_eq!(report.progress, 100);
    }

    #[test]
    fn test_progress_with_nothing_to_commit() {
        let mut report = ImportReport::new(0, 200);
        report.set_progress(0, 0);
        assert_eq!(report.progress, 100);
    }

    #[test]
    fn test_log_is_append_only_in_order() {
        let mut report = ImportReport::new(1, 200);
        report.push_log("first");
        report.push_warning("second");
        report.push_log("third");
        assert_eq!(
            report.log,
            vec!["first".to_string(), "second".to_string(), "third".to_string()]
        );
    }

    #[test]
    fn test_summary_mentions_all_counts() {
        let mut report = ImportReport::new(4, 200);
        report.record_accepted();
        report.record_accepted();
        report.record_rejection(&RejectReason::MissingIdentity { row: 3 });
        report.record_inserted(2);

        let summary = report.summary();
        assert!(summary.contains("4 row(s)"));
        assert!(summary.contains("2 validated"));
        assert!(summary.contains("1 rejected"));
        assert!(summary.contains("2 inserted"));
    }

    #[test]
    fn test_report_serializes_counts() {
        let mut report = ImportReport::new(2, 200);
        report.record_accepted();
        report.record_inserted(1);

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["total_rows"], 2);
        assert_eq!(json["validated_rows"], 1);
        assert_eq!(json["inserted_rows"], 1);
        assert!(json["run_id"].is_string());
    }
}
