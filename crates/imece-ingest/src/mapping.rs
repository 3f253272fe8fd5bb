//! Header mapping: canonical field -> source header
//!
//! Builds a default mapping from the alias tables in [`crate::fields`] and
//! lets a caller override single assignments before the run commits.
//! Matching runs in two passes per field: exact string equality first, then
//! equality after folding case, whitespace, and Turkish diacritics.

use crate::fields::BeneficiaryField;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Fold a header for fuzzy comparison
///
/// Replaces Turkish diacritic characters with base-Latin equivalents before
/// lowercasing ('İ' would otherwise lowercase to "i\u{307}"), drops a bare
/// U+0307 combining dot so pre-decomposed input folds the same way, then
/// collapses internal whitespace runs to single spaces. Idempotent.
pub fn fold_header(s: &str) -> String {
    let mut folded = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            'ç' | 'Ç' => folded.push('c'),
            'ğ' | 'Ğ' => folded.push('g'),
            'ı' | 'İ' => folded.push('i'),
            'ö' | 'Ö' => folded.push('o'),
            'ş' | 'Ş' => folded.push('s'),
            'ü' | 'Ü' => folded.push('u'),
            // combining dot above, left behind by decomposed dotted i
            '\u{307}' => {}
            _ => folded.extend(ch.to_lowercase()),
        }
    }
    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Assignment of canonical fields to source headers
///
/// Fields without an assignment stay unmapped and normalize to null. Two
/// fields may point at the same header; nothing here prevents it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeaderMapping {
    assignments: HashMap<BeneficiaryField, String>,
}

impl HeaderMapping {
    /// Build the default mapping for a parsed header list
    ///
    /// For each canonical field, aliases are tried highest priority first:
    /// one full pass of exact matches, then one full pass of folded matches.
    /// Among duplicate headers the first occurrence wins.
    pub fn detect(headers: &[String]) -> Self {
        let mut mapping = HeaderMapping::default();
        for field in BeneficiaryField::ALL {
            if let Some(header) = find_source(headers, field.aliases()) {
                mapping.assignments.insert(field, header.to_string());
            }
        }
        debug!(
            "mapped {} of {} fields from {} headers",
            mapping.assignments.len(),
            BeneficiaryField::ALL.len(),
            headers.len()
        );
        mapping
    }

    /// Source header currently assigned to `field`, if any
    pub fn source(&self, field: BeneficiaryField) -> Option<&str> {
        self.assignments.get(&field).map(String::as_str)
    }

    /// Override one assignment; `None` clears it back to unmapped
    pub fn set(&mut self, field: BeneficiaryField, header: Option<String>) {
        match header {
            Some(header) => {
                self.assignments.insert(field, header);
            }
            None => {
                self.assignments.remove(&field);
            }
        }
    }

    /// Canonical fields without an assignment, in schema order
    pub fn unmapped(&self) -> Vec<BeneficiaryField> {
        BeneficiaryField::ALL
            .iter()
            .filter(|field| !self.assignments.contains_key(field))
            .copied()
            .collect()
    }

    pub fn mapped_count(&self) -> usize {
        self.assignments.len()
    }
}

fn find_source<'a>(headers: &'a [String], aliases: &[&str]) -> Option<&'a str> {
    for alias in aliases {
        if let Some(header) = headers.iter().find(|h| h.as_str() == *alias) {
            return Some(header);
        }
    }
    for alias in aliases {
        let want = fold_header(alias);
        if let Some(header) = headers.iter().find(|h| fold_header(h) == want) {
            return Some(header);
        }
    }
    None
}
