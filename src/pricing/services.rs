//! Quote service over the startup pricing context.
//!
//! `quote` is a pure function of its inputs and the immutable tables held
//! by [`PricingContext`]; identical requests always produce identical
//! results.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::calculators::{calculate_price, round_money};
use super::distances::DistanceTable;
use super::models::ZipCode;
use super::rates::{RatePolicy, RateSource, RateTable, RouteKey};
use super::requests::QuoteRequest;

/// Tables and policy built once at startup, read-only afterwards
#[derive(Debug, Clone, Default)]
pub struct PricingContext {
    pub distances: DistanceTable,
    pub rates: RateTable,
    pub policy: RatePolicy,
}

impl PricingContext {
    pub fn new(distances: DistanceTable, rates: RateTable, policy: RatePolicy) -> Self {
        Self {
            distances,
            rates,
            policy,
        }
    }
}

/// Result of a quote calculation, rounded for output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteResult {
    pub pickup_zip: ZipCode,
    pub dropoff_zip: ZipCode,
    /// Distance rounded to whole miles
    pub miles: Decimal,
    /// Resolved base rate, 3 dp
    pub base_rate: Decimal,
    /// Final price, 2 dp
    pub final_price: Decimal,
    pub rate_source: RateSource,
}

/// Pricing calculation error types
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("No ZIP match found")]
    LookupMiss { pickup: ZipCode, dropoff: ZipCode },

    #[error("Invalid request: {}", .errors.join("; "))]
    InvalidRequest { errors: Vec<String> },
}

/// Price a validated quote request.
///
/// Fails only with [`PricingError::LookupMiss`] when the ordered ZIP pair
/// has no distance record.
pub fn quote(ctx: &PricingContext, request: &QuoteRequest) -> Result<QuoteResult, PricingError> {
    let pickup = request.pickup_zip;
    let dropoff = request.dropoff_zip;

    let distance = ctx.distances.resolve(pickup, dropoff).ok_or_else(|| {
        warn!(pickup_zip = %pickup, dropoff_zip = %dropoff, "No ZIP match found");
        PricingError::LookupMiss { pickup, dropoff }
    })?;

    let key = RouteKey::new(pickup, dropoff, request.month);
    let resolved = ctx.rates.resolve(&key, &ctx.policy);
    let breakdown = calculate_price(distance, resolved.rate, &request.modifiers);

    debug!(
        route_key = %key,
        %distance,
        base_rate = %resolved.rate,
        mileage_price = %breakdown.mileage_price,
        adjustments = ?breakdown.adjustments,
        total = %breakdown.total,
        "Quote calculated"
    );

    Ok(QuoteResult {
        pickup_zip: pickup,
        dropoff_zip: dropoff,
        miles: round_money(distance, 0),
        base_rate: round_money(resolved.rate, 3),
        final_price: round_money(breakdown.total, 2),
        rate_source: resolved.source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::calculators::Modifiers;
    use rust_decimal_macros::dec;

    fn zip(s: &str) -> ZipCode {
        ZipCode::parse(s).unwrap()
    }

    fn context(rates: RateTable) -> PricingContext {
        let distances = DistanceTable::from_entries([
            (zip("90001"), zip("10001"), dec!(2800)),
            (zip("02134"), zip("33101"), dec!(1480.6)),
        ]);
        PricingContext::new(distances, rates, RatePolicy::default())
    }

    fn request(pickup: &str, dropoff: &str, month: u8, modifiers: Modifiers) -> QuoteRequest {
        QuoteRequest {
            pickup_zip: zip(pickup),
            dropoff_zip: zip(dropoff),
            month,
            modifiers,
        }
    }

    fn plain_quote(
        ctx: &PricingContext,
        pickup: &str,
        dropoff: &str,
        month: u8,
    ) -> Result<QuoteResult, PricingError> {
        quote(ctx, &request(pickup, dropoff, month, Modifiers::default()))
    }

    #[test]
    fn test_direct_route_scenario() {
        let ctx = context(RateTable::from_entries([("90_10_5", dec!(0.6))]));

        let plain = plain_quote(&ctx, "90001", "10001", 5).unwrap();
        assert_eq!(plain.base_rate, dec!(0.6));
        assert_eq!(plain.final_price, dec!(1680.0));
        assert_eq!(plain.miles, dec!(2800));
        assert_eq!(plain.rate_source, RateSource::Direct);

        let enclosed = Modifiers {
            enclosed: true,
            ..Modifiers::default()
        };
        let enclosed = request("90001", "10001", 5, enclosed);
        let result = quote(&ctx, &enclosed).unwrap();
        assert_eq!(result.final_price, dec!(1980.0));
    }

    #[test]
    fn test_fallback_scenario() {
        let ctx = context(RateTable::default());
        let result = plain_quote(&ctx, "90001", "10001", 5).unwrap();
        assert_eq!(result.base_rate, dec!(0.55));
        assert_eq!(result.final_price, dec!(1540.0));
        assert_eq!(result.rate_source, RateSource::Fallback);
    }

    #[test]
    fn test_reverse_route_scenario() {
        let ctx = context(RateTable::from_entries([("10_90_5", dec!(0.6))]));
        let result = plain_quote(&ctx, "90001", "10001", 5).unwrap();
        assert_eq!(result.base_rate, dec!(0.7));
        assert_eq!(result.final_price, dec!(1960));
        assert_eq!(result.rate_source, RateSource::Reverse);
    }

    #[test]
    fn test_lookup_miss_even_when_reverse_pair_exists() {
        let ctx = context(RateTable::default());
        let err = plain_quote(&ctx, "10001", "90001", 5).unwrap_err();
        assert_eq!(
            err,
            PricingError::LookupMiss {
                pickup: zip("10001"),
                dropoff: zip("90001"),
            }
        );
        assert_eq!(err.to_string(), "No ZIP match found");
    }

    #[test]
    fn test_miles_rounded_but_price_uses_exact_distance() {
        let ctx = context(RateTable::default());
        let result = plain_quote(&ctx, "02134", "33101", 1).unwrap();
        assert_eq!(result.miles, dec!(1481));
        // 1480.6 * 0.55
        assert_eq!(result.final_price, dec!(814.33));
    }

    #[test]
    fn test_quote_is_idempotent() {
        let ctx = context(RateTable::from_entries([("90_10_5", dec!(0.6123))]));
        let modifiers = Modifiers {
            classic: true,
            vehicle_count: 2,
            ..Modifiers::default()
        };
        let request = request("90001", "10001", 5, modifiers);
        let first = quote(&ctx, &request).unwrap();
        for _ in 0..10 {
            assert_eq!(quote(&ctx, &request), Ok(first.clone()));
        }
    }

    #[test]
    fn test_invalid_request_display() {
        let err = PricingError::InvalidRequest {
            errors: vec!["month must be between 1 and 12, got 0".to_string()],
        };
        assert!(err.to_string().contains("month"));
    }
}
