//! Request DTOs for the quote endpoint and their validation.

use serde::Deserialize;

use super::calculators::Modifiers;
use super::models::ZipCode;
use super::services::PricingError;

/// Raw quote parameters, from the query string or a JSON body
#[derive(Debug, Clone, Deserialize)]
pub struct QuoteParams {
    pub pickup_zip: String,
    pub dropoff_zip: String,
    pub month: i64,
    #[serde(default)]
    pub enclosed: i64,
    #[serde(default)]
    pub inop: i64,
    #[serde(default)]
    pub classic: i64,
    #[serde(default)]
    pub heavy: i64,
    #[serde(default = "default_vehicle_count")]
    pub vehicle_count: i64,
}

fn default_vehicle_count() -> i64 {
    1
}

/// Validated quote request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteRequest {
    pub pickup_zip: ZipCode,
    pub dropoff_zip: ZipCode,
    pub month: u8,
    pub modifiers: Modifiers,
}

impl QuoteParams {
    /// Validate every field, collecting all problems into one error
    pub fn validate(&self) -> Result<QuoteRequest, PricingError> {
        let mut errors = Vec::new();

        let pickup_zip = ZipCode::parse(&self.pickup_zip);
        if pickup_zip.is_none() {
            errors.push(format!("pickup_zip {:?} is not a ZIP code", self.pickup_zip));
        }
        let dropoff_zip = ZipCode::parse(&self.dropoff_zip);
        if dropoff_zip.is_none() {
            errors.push(format!("dropoff_zip {:?} is not a ZIP code", self.dropoff_zip));
        }

        let month = u8::try_from(self.month)
            .ok()
            .filter(|m| (1..=12).contains(m));
        if month.is_none() {
            let month = self.month;
            errors.push(format!("month must be between 1 and 12, got {month}"));
        }

        let mut flag = |name: &str, value: i64| match value {
            0 => false,
            1 => true,
            other => {
                errors.push(format!("{name} must be 0 or 1, got {other}"));
                false
            }
        };
        let enclosed = flag("enclosed", self.enclosed);
        let inop = flag("inop", self.inop);
        let classic = flag("classic", self.classic);
        let heavy = flag("heavy", self.heavy);

        let vehicle_count = u32::try_from(self.vehicle_count)
            .ok()
            .filter(|c| *c >= 1);
        if vehicle_count.is_none() {
            let count = self.vehicle_count;
            errors.push(format!("vehicle_count must be at least 1, got {count}"));
        }

        let (Some(pickup_zip), Some(dropoff_zip), Some(month), Some(vehicle_count)) =
            (pickup_zip, dropoff_zip, month, vehicle_count)
        else {
            return Err(PricingError::InvalidRequest { errors });
        };
        if !errors.is_empty() {
            return Err(PricingError::InvalidRequest { errors });
        }

        Ok(QuoteRequest {
            pickup_zip,
            dropoff_zip,
            month,
            modifiers: Modifiers {
                enclosed,
                inop,
                classic,
                heavy,
                vehicle_count,
            },
        })
    }
}
