//! Quote route handlers

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};

use crate::error::Result;
use crate::AppState;

use super::requests::QuoteParams;
use super::responses::QuoteResponse;
use super::services::{self, PricingError};

/// Pricing routes, mounted under `/api`
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/quote", get(quote_from_query).post(quote_from_json))
}

/// `GET /api/quote?pickup_zip=..&dropoff_zip=..&month=..`
pub async fn quote_from_query(
    State(state): State<AppState>,
    params: std::result::Result<Query<QuoteParams>, QueryRejection>,
) -> Result<Json<QuoteResponse>> {
    let Query(params) = params.map_err(|rejection| invalid(rejection.body_text()))?;
    price(&state, &params)
}

/// `POST /api/quote` with the same fields as a JSON body
pub async fn quote_from_json(
    State(state): State<AppState>,
    params: std::result::Result<Json<QuoteParams>, JsonRejection>,
) -> Result<Json<QuoteResponse>> {
    let Json(params) = params.map_err(|rejection| invalid(rejection.body_text()))?;
    price(&state, &params)
}

fn price(state: &AppState, params: &QuoteParams) -> Result<Json<QuoteResponse>> {
    let request = params.validate()?;
    let result = services::quote(&state.pricing, &request)?;
    Ok(Json(result.into()))
}

fn invalid(message: String) -> PricingError {
    PricingError::InvalidRequest {
        errors: vec![message],
    }
}
