//! Row normalization: raw row map -> typed beneficiary record
//!
//! All mapped cells pass through as trimmed strings, empty cells become
//! null, and birth dates run an ordered chain of format rules. A date no
//! rule can handle normalizes to null; a row never fails here.

use crate::fields::BeneficiaryField;
use crate::intake::RawRecord;
use crate::mapping::HeaderMapping;
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Normalized record over the canonical beneficiary schema
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Beneficiary {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub nationality: Option<String>,
    pub birth_date: Option<String>,
    pub gender: Option<String>,
    pub blood_type: Option<String>,
    pub identity_number: Option<String>,
    pub email: Option<String>,
    pub mobile_phone: Option<String>,
    pub landline_phone: Option<String>,
    pub foreign_phone: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub district: Option<String>,
    pub neighborhood: Option<String>,
    pub address: Option<String>,
    pub iban: Option<String>,
}

impl Beneficiary {
    pub fn get(&self, field: BeneficiaryField) -> Option<&str> {
        let value = match field {
            BeneficiaryField::FirstName => &self.first_name,
            BeneficiaryField::LastName => &self.last_name,
            BeneficiaryField::Nationality => &self.nationality,
            BeneficiaryField::BirthDate => &self.birth_date,
            BeneficiaryField::Gender => &self.gender,
            BeneficiaryField::BloodType => &self.blood_type,
            BeneficiaryField::IdentityNumber => &self.identity_number,
            BeneficiaryField::Email => &self.email,
            BeneficiaryField::MobilePhone => &self.mobile_phone,
            BeneficiaryField::LandlinePhone => &self.landline_phone,
            BeneficiaryField::ForeignPhone => &self.foreign_phone,
            BeneficiaryField::Country => &self.country,
            BeneficiaryField::City => &self.city,
            BeneficiaryField::District => &self.district,
            BeneficiaryField::Neighborhood => &self.neighborhood,
            BeneficiaryField::Address => &self.address,
            BeneficiaryField::Iban => &self.iban,
        };
        value.as_deref()
    }

    pub fn set(&mut self, field: BeneficiaryField, value: Option<String>) {
        let slot = match field {
            BeneficiaryField::FirstName => &mut self.first_name,
            BeneficiaryField::LastName => &mut self.last_name,
            BeneficiaryField::Nationality => &mut self.nationality,
            BeneficiaryField::BirthDate => &mut self.birth_date,
            BeneficiaryField::Gender => &mut self.gender,
            BeneficiaryField::BloodType => &mut self.blood_type,
            BeneficiaryField::IdentityNumber => &mut self.identity_number,
            BeneficiaryField::Email => &mut self.email,
            BeneficiaryField::MobilePhone => &mut self.mobile_phone,
            BeneficiaryField::LandlinePhone => &mut self.landline_phone,
            BeneficiaryField::ForeignPhone => &mut self.foreign_phone,
            BeneficiaryField::Country => &mut self.country,
            BeneficiaryField::City => &mut self.city,
            BeneficiaryField::District => &mut self.district,
            BeneficiaryField::Neighborhood => &mut self.neighborhood,
            BeneficiaryField::Address => &mut self.address,
            BeneficiaryField::Iban => &mut self.iban,
        };
        *slot = value;
    }

    /// True when every canonical field is null
    pub fn is_blank(&self) -> bool {
        BeneficiaryField::ALL.iter().all(|f| self.get(*f).is_none())
    }
}

/// Convert one raw row into a normalized record using the given mapping
///
/// Unmapped fields and empty cells become null. Only the birth date field
/// gets format treatment; everything else is a trimmed pass-through.
pub fn normalize(raw: &RawRecord, mapping: &HeaderMapping) -> Beneficiary {
    let mut record = Beneficiary::default();
    for field in BeneficiaryField::ALL {
        let header = match mapping.source(field) {
            Some(header) => header,
            None => continue,
        };
        let cell = match raw.get(header) {
            Some(cell) => cell.trim(),
            None => continue,
        };
        if cell.is_empty() {
            continue;
        }
        let value = match field {
            BeneficiaryField::BirthDate => normalize_birth_date(cell),
            _ => Some(cell.to_string()),
        };
        record.set(field, value);
    }
    record
}

type DateRule = fn(&str) -> Option<String>;

/// Ordered birth date format rules; the first producing a value wins.
/// Reordering or adding a format is a data change here, not control flow.
const DATE_RULES: &[(&str, DateRule)] = &[
    ("iso-passthrough", iso_passthrough),
    ("dotted-day-first", dotted_day_first),
    ("slash-month-first", slash_month_first),
    ("calendar-parse", calendar_parse),
];

/// Normalize a birth date cell to `YYYY-MM-DD`, or null if no rule applies
///
/// An unparseable date is not a row failure; the row proceeds with a null
/// birth date.
pub fn normalize_birth_date(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    DATE_RULES.iter().find_map(|(name, rule)| {
        let normalized = rule(trimmed);
        if let Some(ref value) = normalized {
            trace!("birth date {:?} matched rule {} -> {}", trimmed, name, value);
        }
        normalized
    })
}

/// `YYYY-MM-DD` already: accept unchanged
fn iso_passthrough(s: &str) -> Option<String> {
    let b = s.as_bytes();
    let shaped = b.len() == 10
        && b[..4].iter().all(u8::is_ascii_digit)
        && b[4] == b'-'
        && b[5..7].iter().all(u8::is_ascii_digit)
        && b[7] == b'-'
        && b[8..10].iter().all(u8::is_ascii_digit);
    shaped.then(|| s.to_string())
}

/// `D.M.YYYY` (Turkish convention): day first
fn dotted_day_first(s: &str) -> Option<String> {
    rewrite_numeric(s, '.', true)
}

/// `M/D/YYYY`: month first
fn slash_month_first(s: &str) -> Option<String> {
    rewrite_numeric(s, '/', false)
}

/// Shape-only rewrite of a three-part numeric date, zero-padded
///
/// No calendar check happens here; an impossible day or month survives the
/// rewrite and surfaces as a store-level batch failure instead.
fn rewrite_numeric(s: &str, sep: char, day_first: bool) -> Option<String> {
    let mut parts = s.split(sep);
    let (a, b, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }
    let short_num = |p: &str| (1..=2).contains(&p.len()) && p.bytes().all(|c| c.is_ascii_digit());
    if !short_num(a) || !short_num(b) {
        return None;
    }
    if year.len() != 4 || !year.bytes().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let (day, month) = if day_first { (a, b) } else { (b, a) };
    Some(format!("{}-{:0>2}-{:0>2}", year, month, day))
}

/// Generic calendar parse for everything else
///
/// RFC 3339 timestamps reformat through their UTC calendar fields so an
/// offset never shifts the day under local time.
fn calendar_parse(s: &str) -> Option<String> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc).date_naive().format("%Y-%m-%d").to_string());
    }
    const FORMATS: [&str; 5] = ["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d", "%d %B %Y", "%B %d, %Y"];
    FORMATS.iter().find_map(|fmt| {
        NaiveDate::parse_from_str(s, fmt)
            .ok()
            // %Y also matches 1-2 digit years; a pre-1000 birth year is noise
            .filter(|date| date.year() >= 1000)
            .map(|date| date.format("%Y-%m-%d").to_string())
    })
}
