//! Vehicle transport quote service.
//!
//! Prices a shipment from a precomputed ZIP-to-ZIP distance table and a
//! seasonal per-mile rate table, both loaded once at startup.

pub mod config;
pub mod error;
pub mod pricing;

use axum::{extract::State, routing::get, Json, Router};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::Config;
use crate::error::AppError;
use crate::pricing::responses::HealthResponse;
use crate::pricing::{DatasetError, DistanceTable, PricingContext, RateTable};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pricing: Arc<PricingContext>,
}

impl AppState {
    pub fn new(pricing: PricingContext) -> Self {
        Self {
            pricing: Arc::new(pricing),
        }
    }
}

/// Load both datasets named by the configuration
pub fn load_pricing_context(config: &Config) -> Result<PricingContext, DatasetError> {
    let distances = DistanceTable::load(&config.distance_dataset, config.duplicate_rows)?;
    let rates = RateTable::load(&config.rate_table, config.duplicate_rows)?;
    Ok(PricingContext::new(distances, rates, config.rate_policy))
}

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", pricing::router())
        .fallback(not_found)
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        distance_pairs: state.pricing.distances.len(),
        route_rates: state.pricing.rates.len(),
    })
}

async fn not_found() -> AppError {
    AppError::NotFound
}
