//! Response DTOs for pricing API endpoints.

use rust_decimal::Decimal;
use serde::Serialize;

use super::rates::RateSource;
use super::services::QuoteResult;

/// Response for a successful quote
#[derive(Debug, Clone, Serialize)]
pub struct QuoteResponse {
    pub pickup_zip: String,
    pub dropoff_zip: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub miles: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub base_rate: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub final_price: Decimal,
    pub rate_source: RateSource,
}

impl From<QuoteResult> for QuoteResponse {
    fn from(result: QuoteResult) -> Self {
        Self {
            pickup_zip: result.pickup_zip.to_string(),
            dropoff_zip: result.dropoff_zip.to_string(),
            miles: result.miles,
            base_rate: result.base_rate,
            final_price: result.final_price,
            rate_source: result.rate_source,
        }
    }
}

/// Generic error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

/// Response for the health endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub distance_pairs: usize,
    pub route_rates: usize,
}
