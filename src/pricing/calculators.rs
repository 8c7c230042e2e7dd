//! Core pricing calculation functions.
//!
//! Pure functions for pricing math - no I/O, no shared state.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Enclosed trailer surcharge
pub const ENCLOSED_SURCHARGE: Decimal = dec!(300);
/// Inoperable vehicle surcharge
pub const INOP_SURCHARGE: Decimal = dec!(150);
/// Classic car surcharge
pub const CLASSIC_SURCHARGE: Decimal = dec!(200);
/// Heavy vehicle surcharge
pub const HEAVY_SURCHARGE: Decimal = dec!(100);
/// Discount for each vehicle beyond the first
pub const MULTI_VEHICLE_DISCOUNT: Decimal = dec!(50);

/// Round to specified decimal places using banker's rounding (ROUND_HALF_EVEN).
///
/// Banker's rounding rounds to the nearest even number when the value is exactly
/// halfway between two possibilities. This reduces cumulative rounding bias.
///
/// # Examples
/// ```
/// use rust_decimal_macros::dec;
/// use autoship_quote::pricing::round_money;
///
/// assert_eq!(round_money(dec!(2.5), 0), dec!(2));   // rounds to even
/// assert_eq!(round_money(dec!(3.5), 0), dec!(4));   // rounds to even
/// assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
/// ```
pub fn round_money(amount: Decimal, places: u32) -> Decimal {
    amount.round_dp_with_strategy(places, RoundingStrategy::MidpointNearestEven)
}

/// Parse a dataset number such as `2800`, `0.615` or `1.5e3`.
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .ok()
}

/// Shipment characteristics that adjust the price
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Modifiers {
    pub enclosed: bool,
    pub inop: bool,
    pub classic: bool,
    pub heavy: bool,
    pub vehicle_count: u32,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            enclosed: false,
            inop: false,
            classic: false,
            heavy: false,
            vehicle_count: 1,
        }
    }
}

/// Kind of price adjustment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdjustmentKind {
    Enclosed,
    Inop,
    Classic,
    Heavy,
    MultiVehicle,
}

/// A single adjustment applied on top of the mileage price
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Adjustment {
    pub kind: AdjustmentKind,
    pub amount: Decimal,
}

/// Result of price calculation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceBreakdown {
    /// distance * base rate, unrounded
    pub mileage_price: Decimal,
    /// Adjustments in application order
    pub adjustments: Vec<Adjustment>,
    /// Mileage price plus all adjustments, unrounded
    pub total: Decimal,
}

/// List the adjustments for a set of modifiers.
///
/// Order is enclosed, inop, classic, heavy, multi-vehicle. The multi-vehicle
/// discount has no floor.
pub fn adjustments_for(modifiers: &Modifiers) -> Vec<Adjustment> {
    let flags = [
        (modifiers.enclosed, AdjustmentKind::Enclosed, ENCLOSED_SURCHARGE),
        (modifiers.inop, AdjustmentKind::Inop, INOP_SURCHARGE),
        (modifiers.classic, AdjustmentKind::Classic, CLASSIC_SURCHARGE),
        (modifiers.heavy, AdjustmentKind::Heavy, HEAVY_SURCHARGE),
    ];

    let mut adjustments: Vec<Adjustment> = flags
        .into_iter()
        .filter(|(enabled, _, _)| *enabled)
        .map(|(_, kind, amount)| Adjustment { kind, amount })
        .collect();

    if modifiers.vehicle_count > 1 {
        let extra_vehicles = Decimal::from(modifiers.vehicle_count - 1);
        adjustments.push(Adjustment {
            kind: AdjustmentKind::MultiVehicle,
            amount: -(MULTI_VEHICLE_DISCOUNT * extra_vehicles),
        });
    }

    adjustments
}

/// Calculate the price for a distance at a resolved base rate.
pub fn calculate_price(
    distance_miles: Decimal,
    base_rate: Decimal,
    modifiers: &Modifiers,
) -> PriceBreakdown {
    let mileage_price = distance_miles * base_rate;
    let adjustments = adjustments_for(modifiers);
    let total = adjustments
        .iter()
        .fold(mileage_price, |total, adjustment| total + adjustment.amount);

    PriceBreakdown {
        mileage_price,
        adjustments,
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== round_money tests ====================

    #[test]
    fn test_round_money_bankers_rounding_to_even() {
        assert_eq!(round_money(dec!(2.5), 0), dec!(2));
        assert_eq!(round_money(dec!(3.5), 0), dec!(4));
        assert_eq!(round_money(dec!(2.25), 1), dec!(2.2));
        assert_eq!(round_money(dec!(2.35), 1), dec!(2.4));
    }

    #[test]
    fn test_round_money_normal_rounding() {
        assert_eq!(round_money(dec!(1.234), 2), dec!(1.23));
        assert_eq!(round_money(dec!(1.236), 2), dec!(1.24));
        assert_eq!(round_money(dec!(0.7001), 3), dec!(0.700));
    }

    #[test]
    fn test_round_money_negative() {
        assert_eq!(round_money(dec!(-2.5), 0), dec!(-2));
        assert_eq!(round_money(dec!(-1.234), 2), dec!(-1.23));
    }

    // ==================== parse_decimal tests ====================

    #[test]
    fn test_parse_decimal_forms() {
        assert_eq!(parse_decimal("2800"), Some(dec!(2800)));
        assert_eq!(parse_decimal(" 0.615 "), Some(dec!(0.615)));
        assert_eq!(parse_decimal("2800.0"), Some(dec!(2800)));
        assert_eq!(parse_decimal("1.5e3"), Some(dec!(1500)));
        assert_eq!(parse_decimal("far"), None);
        assert_eq!(parse_decimal(""), None);
    }

    // ==================== calculate_price tests ====================

    #[test]
    fn test_price_without_modifiers() {
        let breakdown = calculate_price(dec!(2800), dec!(0.6), &Modifiers::default());
        assert_eq!(breakdown.mileage_price, dec!(1680));
        assert!(breakdown.adjustments.is_empty());
        assert_eq!(breakdown.total, dec!(1680));
    }

    #[test]
    fn test_enclosed_adds_300() {
        let modifiers = Modifiers {
            enclosed: true,
            ..Modifiers::default()
        };
        let breakdown = calculate_price(dec!(2800), dec!(0.6), &modifiers);
        assert_eq!(breakdown.total, dec!(1980));
    }

    #[test]
    fn test_all_flags_add_750() {
        let plain = calculate_price(dec!(1234.5), dec!(0.71), &Modifiers::default());
        let modifiers = Modifiers {
            enclosed: true,
            inop: true,
            classic: true,
            heavy: true,
            vehicle_count: 1,
        };
        let flagged = calculate_price(dec!(1234.5), dec!(0.71), &modifiers);
        assert_eq!(flagged.total - plain.total, dec!(750));

        let kinds: Vec<AdjustmentKind> = flagged.adjustments.iter().map(|a| a.kind).collect();
        assert_eq!(
            kinds,
            vec![
                AdjustmentKind::Enclosed,
                AdjustmentKind::Inop,
                AdjustmentKind::Classic,
                AdjustmentKind::Heavy,
            ]
        );
    }

    #[test]
    fn test_three_vehicles_subtract_100() {
        let single = calculate_price(dec!(500), dec!(0.55), &Modifiers::default());
        let modifiers = Modifiers {
            vehicle_count: 3,
            ..Modifiers::default()
        };
        let triple = calculate_price(dec!(500), dec!(0.55), &modifiers);
        assert_eq!(single.total - triple.total, dec!(100));
        assert_eq!(
            triple.adjustments,
            vec![Adjustment {
                kind: AdjustmentKind::MultiVehicle,
                amount: dec!(-100),
            }]
        );
    }

    #[test]
    fn test_multi_vehicle_discount_has_no_floor() {
        let modifiers = Modifiers {
            vehicle_count: 11,
            ..Modifiers::default()
        };
        let breakdown = calculate_price(dec!(100), dec!(0.55), &modifiers);
        // 55 - 50 * 10
        assert_eq!(breakdown.total, dec!(-445));
    }

    #[test]
    fn test_zero_distance() {
        let modifiers = Modifiers {
            heavy: true,
            ..Modifiers::default()
        };
        let breakdown = calculate_price(Decimal::ZERO, dec!(0.55), &modifiers);
        assert_eq!(breakdown.total, dec!(100));
    }
}
