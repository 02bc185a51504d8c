//! # Error Handling Middleware
//!
//! Maps domain errors to HTTP status codes and JSON error responses so every
//! endpoint fails the same way.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

use atelier_core::errors::AtelierError;

/// Application error wrapper that provides HTTP status code mapping.
///
/// Wraps a domain [`AtelierError`] and implements `IntoResponse`, so handlers
/// can return `Result<_, AppError>` and use `?` on store calls.
#[derive(Debug)]
pub struct AppError(pub AtelierError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            AtelierError::NotFound(_) => StatusCode::NOT_FOUND,
            AtelierError::InvalidWeekKey(_) | AtelierError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AtelierError::IdExhaustion { .. } => StatusCode::SERVICE_UNAVAILABLE,
            AtelierError::Decode { .. } | AtelierError::Encode { .. } | AtelierError::Io(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let message = self.0.to_string();
        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

impl From<AtelierError> for AppError {
    fn from(err: AtelierError) -> Self {
        AppError(err)
    }
}
