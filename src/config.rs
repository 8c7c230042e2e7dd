//! Service configuration from environment variables

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use crate::pricing::{DuplicatePolicy, RatePolicy};

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub distance_dataset: PathBuf,
    pub rate_table: PathBuf,
    pub rate_policy: RatePolicy,
    pub duplicate_rows: DuplicatePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8080,
            distance_dataset: PathBuf::from("data/zip_distances.csv"),
            rate_table: PathBuf::from("data/seasonal_rates.json"),
            rate_policy: RatePolicy::default(),
            duplicate_rows: DuplicatePolicy::default(),
        }
    }
}

impl Config {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`; unset variables take defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let policy = defaults.rate_policy;
        let rate_policy = RatePolicy {
            reverse_upcharge: parse_or(&lookup, "REVERSE_UPCHARGE", policy.reverse_upcharge)?,
            fallback_rate: parse_or(&lookup, "FALLBACK_RATE", policy.fallback_rate)?,
        };
        if rate_policy.reverse_upcharge < Decimal::ZERO {
            anyhow::bail!("REVERSE_UPCHARGE must not be negative");
        }
        if rate_policy.fallback_rate <= Decimal::ZERO {
            anyhow::bail!("FALLBACK_RATE must be positive");
        }

        let duplicate_rows = match lookup("DUPLICATE_ROWS") {
            Some(value) => value
                .parse::<DuplicatePolicy>()
                .map_err(anyhow::Error::msg)
                .context("Invalid DUPLICATE_ROWS value")?,
            None => defaults.duplicate_rows,
        };

        Ok(Self {
            bind_addr: parse_or(&lookup, "BIND_ADDR", defaults.bind_addr)?,
            port: parse_or(&lookup, "PORT", defaults.port)?,
            distance_dataset: lookup("DISTANCE_DATASET")
                .map(PathBuf::from)
                .unwrap_or(defaults.distance_dataset),
            rate_table: lookup("RATE_TABLE")
                .map(PathBuf::from)
                .unwrap_or(defaults.rate_table),
            rate_policy,
            duplicate_rows,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse::<T>()
                .map_err(|e| anyhow::anyhow!("Invalid {} value {:?}: {}", key, value, e))
        })
        .transpose()
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    Ok(parse_var(lookup, key)?.unwrap_or(default))
}
