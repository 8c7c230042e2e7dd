//! Seasonal base-rate table and route keys.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use tracing::{debug, info, warn};

use super::calculators::{parse_decimal, round_money};
use super::distances::DuplicatePolicy;
use super::models::{DatasetError, ZipCode};

/// Rate used when neither direction of a route is in the table
pub const DEFAULT_FALLBACK_RATE: Decimal = dec!(0.55);
/// Added to the reverse-direction rate when only that direction is known
pub const DEFAULT_REVERSE_UPCHARGE: Decimal = dec!(0.1);

/// Operator-tunable parts of base-rate resolution
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatePolicy {
    pub reverse_upcharge: Decimal,
    pub fallback_rate: Decimal,
}

impl Default for RatePolicy {
    fn default() -> Self {
        Self {
            reverse_upcharge: DEFAULT_REVERSE_UPCHARGE,
            fallback_rate: DEFAULT_FALLBACK_RATE,
        }
    }
}

/// Directional pricing lane for one month: `"{pickup}_{dropoff}_{month}"`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteKey {
    pickup_prefix: String,
    dropoff_prefix: String,
    month: u8,
}

impl RouteKey {
    pub fn new(pickup: ZipCode, dropoff: ZipCode, month: u8) -> Self {
        Self {
            pickup_prefix: pickup.prefix().to_string(),
            dropoff_prefix: dropoff.prefix().to_string(),
            month,
        }
    }

    /// Parse a key as written in the rate document.
    ///
    /// Both prefixes must be two digits and the month an unpadded `1..=12`,
    /// so `"90_10_05"` and `"9_10_5"` are rejected.
    pub fn parse(raw: &str) -> Option<Self> {
        let mut parts = raw.split('_');
        let (pickup, dropoff, month) = (parts.next()?, parts.next()?, parts.next()?);
        if parts.next().is_some() {
            return None;
        }

        let is_prefix = |p: &str| p.len() == 2 && p.bytes().all(|b| b.is_ascii_digit());
        let is_month = |m: &str| !m.starts_with('0') && m.bytes().all(|b| b.is_ascii_digit());
        if !is_prefix(pickup) || !is_prefix(dropoff) || !is_month(month) {
            return None;
        }
        let month = month.parse::<u8>().ok().filter(|m| (1..=12).contains(m))?;

        Some(Self {
            pickup_prefix: pickup.to_string(),
            dropoff_prefix: dropoff.to_string(),
            month,
        })
    }

    /// Same lane travelled the other way
    pub fn reversed(&self) -> Self {
        Self {
            pickup_prefix: self.dropoff_prefix.clone(),
            dropoff_prefix: self.pickup_prefix.clone(),
            month: self.month,
        }
    }
}

impl fmt::Display for RouteKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}_{}", self.pickup_prefix, self.dropoff_prefix, self.month)
    }
}

/// Where a resolved base rate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RateSource {
    Direct,
    Reverse,
    Fallback,
}

/// A base rate together with its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedRate {
    pub rate: Decimal,
    pub source: RateSource,
}

/// Rate document entries in file order, repeated keys included
struct RateEntries(Vec<(String, serde_json::Value)>);

impl<'de> Deserialize<'de> for RateEntries {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = RateEntries;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an object of route keys to rates")
            }

            fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some(entry) = map.next_entry::<String, serde_json::Value>()? {
                    entries.push(entry);
                }
                Ok(RateEntries(entries))
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// Route key -> dollars per mile
#[derive(Debug, Clone, Default)]
pub struct RateTable {
    rates: HashMap<RouteKey, Decimal>,
}

impl RateTable {
    /// Load the rate document from a JSON file
    pub fn load(path: &Path, duplicates: DuplicatePolicy) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_json_str(&content, duplicates)?;
        info!("Loaded {} route rates from {}", table.len(), path.display());
        Ok(table)
    }

    /// Parse a JSON object of route key to rate.
    ///
    /// Keys must parse as [`RouteKey`]. Values may be numbers or numeric
    /// strings and must be positive. A key repeated in the document is
    /// handled like a repeated distance row.
    pub fn from_json_str(content: &str, duplicates: DuplicatePolicy) -> Result<Self, DatasetError> {
        let RateEntries(entries) = serde_json::from_str(content)?;
        let mut rates = HashMap::with_capacity(entries.len());

        for (raw_key, value) in entries {
            let Some(key) = RouteKey::parse(&raw_key) else {
                return Err(DatasetError::InvalidRouteKey { key: raw_key });
            };

            let text = match value {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
            let rate = parse_decimal(&text)
                .filter(|rate| *rate > Decimal::ZERO)
                .ok_or_else(|| DatasetError::InvalidNumber {
                    field: "base rate",
                    value: text.clone(),
                    location: format!("key {raw_key}"),
                })?;

            if rates.contains_key(&key) {
                match duplicates {
                    DuplicatePolicy::FirstWins => {
                        warn!(route_key = %key, "Duplicate route rate ignored");
                        continue;
                    }
                    DuplicatePolicy::Reject => {
                        return Err(DatasetError::DuplicateRouteKey { key: raw_key });
                    }
                }
            }
            rates.insert(key, rate);
        }

        Ok(Self { rates })
    }

    #[cfg(test)]
    pub(crate) fn from_entries<'a>(entries: impl IntoIterator<Item = (&'a str, Decimal)>) -> Self {
        let rates = entries
            .into_iter()
            .map(|(key, rate)| (RouteKey::parse(key).expect("valid route key"), rate))
            .collect();
        Self { rates }
    }

    pub fn get(&self, key: &RouteKey) -> Option<Decimal> {
        self.rates.get(key).copied()
    }

    /// Resolve the base rate: direct key, then the reverse key plus the
    /// upcharge (rounded to 3 dp), then the fallback rate.
    pub fn resolve(&self, key: &RouteKey, policy: &RatePolicy) -> ResolvedRate {
        if let Some(rate) = self.get(key) {
            debug!(route_key = %key, %rate, "Direct route rate");
            return ResolvedRate {
                rate,
                source: RateSource::Direct,
            };
        }

        let reverse = key.reversed();
        if let Some(rate) = self.get(&reverse) {
            let rate = round_money(rate + policy.reverse_upcharge, 3);
            debug!(route_key = %key, reverse_key = %reverse, %rate, "Reverse route rate");
            return ResolvedRate {
                rate,
                source: RateSource::Reverse,
            };
        }

        debug!(route_key = %key, rate = %policy.fallback_rate, "Fallback route rate");
        ResolvedRate {
            rate: policy.fallback_rate,
            source: RateSource::Fallback,
        }
    }

    pub fn len(&self) -> usize {
        self.rates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}
