//! Pricing engine module.
//!
//! Resolves a ZIP pair to a precomputed distance, resolves the route and
//! month to a seasonal base rate, and applies shipment modifiers.

pub mod calculators;
pub mod distances;
pub mod models;
pub mod rates;
pub mod requests;
pub mod responses;
pub mod routes;
pub mod services;

// Re-export commonly used items
pub use calculators::{round_money, Modifiers};
pub use distances::{DistanceTable, DuplicatePolicy};
pub use models::{DatasetError, ZipCode};
pub use rates::{RatePolicy, RateSource, RateTable, RouteKey};
pub use routes::router;
pub use services::{quote, PricingContext, PricingError, QuoteResult};
