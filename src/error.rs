//! Error handling for the application

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};

use crate::pricing::responses::ErrorResponse;
use crate::pricing::PricingError;

/// Application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Pricing(#[from] PricingError),

    #[error("Not found")]
    NotFound,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            AppError::Pricing(PricingError::LookupMiss { .. }) => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "No ZIP match found".to_string(),
                    details: vec![],
                },
            ),
            AppError::Pricing(PricingError::InvalidRequest { errors }) => {
                tracing::debug!("Invalid quote request: {:?}", errors);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: "Invalid request".to_string(),
                        details: errors,
                    },
                )
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorResponse {
                    error: "Not found".to_string(),
                    details: vec![],
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
