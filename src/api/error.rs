//! API error types with structured JSON responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::config::MAX_UPLOAD_BYTES;
use crate::pipeline::PipelineError;

/// Structured error response body.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: &'static str,
    pub message: String,
}

/// API-level errors with HTTP status mapping.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Unsupported image format")]
    UnsupportedMedia,
    #[error("Upload exceeds size limit")]
    PayloadTooLarge { limit_mb: usize },
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            ApiError::BadRequest(detail) => {
                (StatusCode::BAD_REQUEST, "BAD_REQUEST", detail.clone())
            }
            ApiError::Decode(detail) => (
                StatusCode::BAD_REQUEST,
                "DECODE_FAILED",
                format!("Failed to decode image: {detail}"),
            ),
            ApiError::UnsupportedMedia => (
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "UNSUPPORTED_MEDIA_TYPE",
                "File type not supported. Upload a JPEG, PNG, or WebP image.".to_string(),
            ),
            ApiError::PayloadTooLarge { limit_mb } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                format!("File too large. Maximum {limit_mb} MB."),
            ),
            ApiError::Internal(detail) => {
                tracing::error!(detail, "API internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ErrorBody {
            error: ErrorDetail { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::TooSmall => {
                ApiError::BadRequest("Image data too small to be valid".into())
            }
            PipelineError::TooLarge(_) => ApiError::PayloadTooLarge {
                limit_mb: MAX_UPLOAD_BYTES / (1024 * 1024),
            },
            PipelineError::UnsupportedFormat => ApiError::UnsupportedMedia,
            PipelineError::Decode(detail) => ApiError::Decode(detail),
            PipelineError::Encoding(detail) => ApiError::Internal(detail),
        }
    }
}
