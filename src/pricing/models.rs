//! Data models for the pricing datasets.
//!
//! ZIP codes, raw dataset rows, and the errors raised while loading them.

use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;

/// Width of a canonical ZIP code
pub const ZIP_WIDTH: usize = 5;

/// Canonical 5-digit, zero-padded ZIP code.
///
/// Every ZIP used as a lookup key goes through [`ZipCode::parse`], both when
/// the distance dataset is loaded and when a request arrives, so `"2134"`,
/// `" 02134 "` and `"02134-1234"` all resolve to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ZipCode([u8; ZIP_WIDTH]);

impl ZipCode {
    /// Normalize a raw ZIP into its canonical form.
    ///
    /// Returns `None` for empty input, non-digit characters, or more than
    /// five digits before an optional `-NNNN` suffix.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        let digits = match trimmed.split_once('-') {
            Some((zip5, plus4)) => {
                if plus4.len() != 4 || !plus4.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                zip5
            }
            None => trimmed,
        };

        let bytes = digits.as_bytes();
        if bytes.is_empty() || bytes.len() > ZIP_WIDTH || !bytes.iter().all(u8::is_ascii_digit) {
            return None;
        }

        let mut zip = [b'0'; ZIP_WIDTH];
        zip[ZIP_WIDTH - bytes.len()..].copy_from_slice(bytes);
        Some(Self(zip))
    }

    pub fn as_str(&self) -> &str {
        // Only ASCII digits are ever stored
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Two-character region prefix used in route keys
    pub fn prefix(&self) -> &str {
        &self.as_str()[..2]
    }
}

impl fmt::Display for ZipCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw row of the distance dataset.
///
/// Every column is read as text; ZIPs stored as integers and distances
/// written as `2800` or `2800.0` are normalized by the loader.
#[derive(Debug, Clone, Deserialize)]
pub struct DistanceRow {
    pub pickup_zip: String,
    pub dropoff_zip: String,
    pub distance_miles: String,
}

/// Errors raised while loading the startup datasets
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid ZIP code {value:?} on line {line}")]
    InvalidZip { line: u64, value: String },

    #[error("Invalid {field} {value:?} ({location})")]
    InvalidNumber {
        field: &'static str,
        value: String,
        location: String,
    },

    #[error("Duplicate distance row for {pickup} -> {dropoff} on line {line}")]
    DuplicatePair {
        pickup: ZipCode,
        dropoff: ZipCode,
        line: u64,
    },

    #[error("Invalid route key {key:?}")]
    InvalidRouteKey { key: String },

    #[error("Duplicate route key {key:?}")]
    DuplicateRouteKey { key: String },
}
