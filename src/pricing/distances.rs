//! Precomputed ZIP-to-ZIP road distances.
//!
//! The table is loaded once at startup and never mutated. Lookups are exact
//! matches on the ordered pair: `A -> B` and `B -> A` are distinct keys.

use rust_decimal::Decimal;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

use super::calculators::parse_decimal;
use super::models::{DatasetError, DistanceRow, ZipCode};

/// How repeated rows for one ordered ZIP pair are handled at load time
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
    /// Keep the first row in load order, log and skip the rest
    #[default]
    FirstWins,
    /// Fail the load
    Reject,
}

impl std::str::FromStr for DuplicatePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "first_wins" => Ok(Self::FirstWins),
            "reject" => Ok(Self::Reject),
            other => Err(format!("unknown duplicate policy {other:?}")),
        }
    }
}

/// In-memory distance lookup keyed by ordered (pickup, dropoff)
#[derive(Debug, Clone, Default)]
pub struct DistanceTable {
    pairs: HashMap<(ZipCode, ZipCode), Decimal>,
}

impl DistanceTable {
    /// Load the distance dataset from a CSV file
    pub fn load(path: &Path, duplicates: DuplicatePolicy) -> Result<Self, DatasetError> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_csv_reader(file, duplicates)?;
        info!("Loaded {} distance pairs from {}", table.len(), path.display());
        Ok(table)
    }

    /// Build the table from CSV with `pickup_zip`, `dropoff_zip` and
    /// `distance_miles` headers. Extra columns are ignored.
    pub fn from_csv_reader<R: Read>(
        reader: R,
        duplicates: DuplicatePolicy,
    ) -> Result<Self, DatasetError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let headers = csv_reader.headers()?.clone();
        let mut pairs = HashMap::new();

        for result in csv_reader.records() {
            let record = result?;
            let line = record.position().map_or(0, |p| p.line());
            let row: DistanceRow = record.deserialize(Some(&headers))?;

            let zip = |value: &str| {
                ZipCode::parse(value).ok_or_else(|| DatasetError::InvalidZip {
                    line,
                    value: value.to_string(),
                })
            };
            let pickup = zip(&row.pickup_zip)?;
            let dropoff = zip(&row.dropoff_zip)?;

            let distance = parse_decimal(&row.distance_miles)
                .filter(|d| !d.is_sign_negative())
                .ok_or_else(|| DatasetError::InvalidNumber {
                    field: "distance_miles",
                    value: row.distance_miles.clone(),
                    location: format!("line {line}"),
                })?;

            if pairs.contains_key(&(pickup, dropoff)) {
                match duplicates {
                    DuplicatePolicy::FirstWins => {
                        warn!(%pickup, %dropoff, line, "Duplicate distance row ignored");
                        continue;
                    }
                    DuplicatePolicy::Reject => {
                        return Err(DatasetError::DuplicatePair {
                            pickup,
                            dropoff,
                            line,
                        });
                    }
                }
            }
            pairs.insert((pickup, dropoff), distance);
        }

        Ok(Self { pairs })
    }

    #[cfg(test)]
    pub(crate) fn from_entries(
        entries: impl IntoIterator<Item = (ZipCode, ZipCode, Decimal)>,
    ) -> Self {
        let mut pairs = HashMap::new();
        for (pickup, dropoff, distance) in entries {
            pairs.entry((pickup, dropoff)).or_insert(distance);
        }
        Self { pairs }
    }

    /// Exact-match distance lookup for the ordered pair
    pub fn resolve(&self, pickup: ZipCode, dropoff: ZipCode) -> Option<Decimal> {
        self.pairs.get(&(pickup, dropoff)).copied()
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}
