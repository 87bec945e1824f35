//! API error handling
//!
//! Consistent JSON error responses across all endpoints.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use github::{DeliveryError, SignatureError};
use serde::Serialize;
use tracing::{error, warn};

/// Structured JSON error response
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

/// API error type that converts to JSON responses
#[derive(Debug)]
pub enum ApiError {
    /// Request can't be interpreted (bad headers or body)
    BadRequest(String),
    /// Signature does not match the payload
    Unauthorized(String),
    /// Internal server error
    Internal(String),
}

impl From<DeliveryError> for ApiError {
    fn from(err: DeliveryError) -> Self {
        match err {
            DeliveryError::SignatureMismatch => ApiError::Unauthorized(err.to_string()),
            DeliveryError::Signature(SignatureError::BodyRead(_))
            | DeliveryError::Signature(SignatureError::DigestCompute(_)) => {
                ApiError::Internal(err.to_string())
            }
            DeliveryError::Signature(SignatureError::MalformedHeader(_))
            | DeliveryError::LegacySignatureRejected(_)
            | DeliveryError::MissingEventType
            | DeliveryError::Decode { .. } => ApiError::BadRequest(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, response) = match self {
            ApiError::BadRequest(msg) => {
                warn!("Rejected webhook: {}", msg);
                (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse {
                        error: msg,
                        code: Some("bad_request".to_string()),
                    },
                )
            }
            ApiError::Unauthorized(msg) => {
                warn!("Rejected webhook: {}", msg);
                (
                    StatusCode::UNAUTHORIZED,
                    ErrorResponse {
                        error: msg,
                        code: Some("invalid_signature".to_string()),
                    },
                )
            }
            ApiError::Internal(msg) => {
                error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "Internal server error".to_string(),
                        code: Some("internal_error".to_string()),
                    },
                )
            }
        };

        (status, Json(response)).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
