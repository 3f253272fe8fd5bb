//! File intake: raw upload bytes -> headers + raw row maps
//!
//! The only fatal failures live here. Bytes that cannot be decoded as UTF-8
//! or structurally parsed abort the run; every later irregularity (short
//! rows, blank rows, unreadable lines) is absorbed and logged.

use crate::{ImportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Cursor;
use tracing::{debug, warn};

/// One input row as parsed: source header -> raw cell value
///
/// Only kept until normalization; the typed [`crate::Beneficiary`] record
/// takes over from there.
pub type RawRecord = HashMap<String, String>;

/// Cell separator for the delimited input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Delimiter {
    Comma,
    Semicolon,
    Tab,
    Pipe,
}

impl Delimiter {
    /// Candidate set for auto-detection, in tie-break order
    pub const CANDIDATES: [Delimiter; 4] = [
        Delimiter::Comma,
        Delimiter::Semicolon,
        Delimiter::Tab,
        Delimiter::Pipe,
    ];

    pub fn as_char(self) -> char {
        match self {
            Delimiter::Comma => ',',
            Delimiter::Semicolon => ';',
            Delimiter::Tab => '\t',
            Delimiter::Pipe => '|',
        }
    }

    pub fn as_byte(self) -> u8 {
        self.as_char() as u8
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Delimiter::Comma => "comma",
            Delimiter::Semicolon => "semicolon",
            Delimiter::Tab => "tab",
            Delimiter::Pipe => "pipe",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for Delimiter {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "comma" | "," => Ok(Delimiter::Comma),
            "semicolon" | ";" => Ok(Delimiter::Semicolon),
            "tab" | "\t" => Ok(Delimiter::Tab),
            "pipe" | "|" => Ok(Delimiter::Pipe),
            _ => Err(anyhow::anyhow!("Invalid delimiter: {}", s)),
        }
    }
}

/// Parsed upload: resolved delimiter, trimmed headers, raw rows
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub delimiter: Delimiter,
    pub headers: Vec<String>,
    pub rows: Vec<RawRecord>,
}

/// Pick the candidate delimiter occurring most often in the first line
///
/// Ties keep the earlier candidate, so a line with no candidate at all
/// falls back to comma.
fn detect_delimiter(first_line: &str) -> Delimiter {
    let mut best = Delimiter::Comma;
    let mut best_count = first_line.matches(best.as_char()).count();
    for candidate in &Delimiter::CANDIDATES[1..] {
        let count = first_line.matches(candidate.as_char()).count();
        if count > best_count {
            best = *candidate;
            best_count = count;
        }
    }
    best
}

/// Parse uploaded bytes into headers and raw per-row field maps
///
/// Uses `hint` as the delimiter when given, otherwise auto-detects from the
/// first line. Header strings are trimmed and kept positionally, duplicates
/// included; within a row map the first occurrence of a duplicated header
/// wins. Rows whose every cell is empty are dropped as formatting artifacts.
pub fn parse(bytes: &[u8], hint: Option<Delimiter>) -> Result<ParsedFile> {
    let text = std::str::from_utf8(bytes).map_err(ImportError::Decode)?;
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let delimiter = hint.unwrap_or_else(|| {
        let first_line = text.lines().next().unwrap_or_default();
        detect_delimiter(first_line)
    });
    debug!("using {} delimiter (hint: {})", delimiter, hint.is_some());

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter.as_byte())
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(Cursor::new(text.as_bytes()));

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

    let mut rows = Vec::new();
    let mut dropped_blank = 0usize;
    for (line, result) in reader.records().enumerate() {
        let record = match result {
            Ok(record) => record,
            Err(err) => {
                warn!("skipping unreadable row {}: {}", line + 1, err);
                continue;
            }
        };
        if record.iter().all(|cell| cell.is_empty()) {
            dropped_blank += 1;
            continue;
        }
        let mut raw = RawRecord::new();
        for (header, cell) in headers.iter().zip(record.iter()) {
            raw.entry(header.clone()).or_insert_with(|| cell.to_string());
        }
        rows.push(raw);
    }

    if dropped_blank > 0 {
        debug!("dropped {} blank row(s)", dropped_blank);
    }

    Ok(ParsedFile {
        delimiter,
        headers,
        rows,
    })
}
