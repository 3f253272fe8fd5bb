//! Row validation: accept or reject each normalized record
//!
//! Pure and order-independent across rows. A rejection never halts the run;
//! the committer simply never sees the record.

use crate::normalize::Beneficiary;
use thiserror::Error;

/// Why a row was rejected, carrying its 1-based row number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    #[error("row {row}: identity fields missing (first and last name both empty)")]
    MissingIdentity { row: usize },

    #[error("row {row}: malformed email {email:?} (missing '@')")]
    MalformedEmail { row: usize, email: String },
}

impl RejectReason {
    pub fn row(&self) -> usize {
        match self {
            RejectReason::MissingIdentity { row } => *row,
            RejectReason::MalformedEmail { row, .. } => *row,
        }
    }
}

/// Outcome of validating one row
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    Accepted(Beneficiary),
    Rejected(RejectReason),
}

/// Classify one normalized record
///
/// `row` is 1-based, matching what an operator sees in a spreadsheet.
/// Deliberately permissive beyond the two rules here; phone format, IBAN
/// checksum, and identity number checksum are unimplemented extension
/// points.
pub fn validate(record: Beneficiary, row: usize) -> RowOutcome {
    let blank = |value: &Option<String>| value.as_deref().map_or(true, |s| s.trim().is_empty());

    if blank(&record.first_name) && blank(&record.last_name) {
        return RowOutcome::Rejected(RejectReason::MissingIdentity { row });
    }

    if let Some(email) = &record.email {
        if !email.contains('@') {
            return RowOutcome::Rejected(RejectReason::MalformedEmail {
                row,
                email: email.clone(),
            });
        }
    }

    RowOutcome::Accepted(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(first: Option<&str>, last: Option<&str>) -> Beneficiary {
        Beneficiary {
            first_name: first.map(String::from),
            last_name: last.map(String::from),
            ..Beneficiary::default()
        }
    }

    #[test]
    fn test_both_names_missing_rejects() {
        let outcome = validate(named(None, None), 3);
        assert_eq!(
            outcome,
            RowOutcome::Rejected(RejectReason::MissingIdentity { row: 3 })
        );
    }

    #[test]
    fn test_empty_string_names_count_as_missing() {
        let outcome = validate(named(Some(""), Some("  ")), 5);
        assert!(matches!(
            outcome,
            RowOutcome::Rejected(RejectReason::MissingIdentity { row: 5 })
        ));
    }

    #[test]
    fn test_one_name_is_enough() {
        assert!(matches!(
            validate(named(Some("Ayşe"), None), 1),
            RowOutcome::Accepted(_)
        ));
        assert!(matches!(
            validate(named(None, Some("Yılmaz")), 1),
            RowOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_email_without_at_rejects() {
        let mut record = named(Some("Ayşe"), Some("Yılmaz"));
        record.email = Some("ayse.example.org".to_string());

        match validate(record, 7) {
            RowOutcome::Rejected(RejectReason::MalformedEmail { row, email }) => {
                assert_eq!(row, 7);
                assert_eq!(email, "ayse.example.org");
            }
            other => panic!("expected malformed email rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_email_with_at_accepts() {
        let mut record = named(Some("Ayşe"), Some("Yılmaz"));
        record.email = Some("ayse@example.org".to_string());
        assert!(matches!(validate(record, 1), RowOutcome::Accepted(_)));
    }

    #[test]
    fn test_missing_email_accepts() {
        assert!(matches!(
            validate(named(Some("Ayşe"), Some("Yılmaz")), 1),
            RowOutcome::Accepted(_)
        ));
    }

    #[test]
    fn test_reason_message_contains_one_based_row() {
        let reason = RejectReason::MissingIdentity { row: 12 };
        assert!(reason.to_string().contains("row 12"));
        assert_eq!(reason.row(), 12);

        let reason = RejectReason::MalformedEmail {
            row: 4,
            email: "nope".to_string(),
        };
        assert!(reason.to_string().contains("row 4"));
        assert!(reason.to_string().contains("nope"));
    }

    #[test]
    fn test_identity_rule_runs_before_email_rule() {
        let record = Beneficiary {
            email: Some("no-at-sign".to_string()),
            ..Beneficiary::default()
        };
        assert!(matches!(
            validate(record, 2),
            RowOutcome::Rejected(RejectReason::MissingIdentity { row: 2 })
        ));
    }
}
