//! Error types for persona-api
//!
//! Every domain error reaches the client through one exhaustive match, so the
//! status code for each variant is decided in exactly one place.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use persona_common::Error;
use serde_json::json;
use thiserror::Error;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Error from the store, the services or request validation
    #[error(transparent)]
    Domain(#[from] Error),

    /// Body missing, not JSON, or wrong shape
    #[error("Invalid request body: {0}")]
    Json(#[from] JsonRejection),

    /// Query string could not be parsed
    #[error("Invalid query: {0}")]
    Query(#[from] QueryRejection),

    /// Path parameter could not be parsed
    #[error("Invalid path: {0}")]
    Path(#[from] PathRejection),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code, message) = match self {
            ApiError::Domain(err) => match err {
                Error::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),
                Error::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg),
                Error::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg),
                Error::Internal(msg) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg)
                }
                Error::PartialEnrichment => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "enrichment failed".to_string(),
                ),
                Error::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR", msg),
                Error::Io(err) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "IO_ERROR",
                    err.to_string(),
                ),
            },
            ApiError::Json(rejection) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                rejection.body_text(),
            ),
            ApiError::Query(rejection) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text())
            }
            ApiError::Path(rejection) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", rejection.body_text())
            }
        };

        let body = Json(json!({
            "error": {
                "code": error_code,
                "message": message,
            }
        }));

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
