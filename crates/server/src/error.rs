// crates/server/src/error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use claude_pulse_core::{InstructionsError, ScanError};
use serde::Serialize;
use thiserror::Error;

/// Structured JSON error response for API errors.
#[derive(Debug, Serialize)]
#[cfg_attr(test, derive(serde::Deserialize))]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: None,
        }
    }

    pub fn with_details(error: impl Into<String>, details: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            details: Some(details.into()),
        }
    }
}

/// API error types that map to HTTP status codes.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Scan error: {0}")]
    Scan(#[from] ScanError),

    #[error("Instructions error: {0}")]
    Instructions(#[from] InstructionsError),

    #[error("Not supported on this platform: {0}")]
    Unsupported(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_response) = match &self {
            ApiError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, ErrorResponse::new(msg.clone()))
            }
            ApiError::Scan(scan_err) => {
                tracing::error!(error = %scan_err, "Scan failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::with_details("Scan failed", scan_err.to_string()),
                )
            }
            ApiError::Instructions(instr_err) => match instr_err {
                InstructionsError::EmptyInstruction => (
                    StatusCode::BAD_REQUEST,
                    ErrorResponse::new("No instruction provided"),
                ),
                other => {
                    tracing::error!(error = %other, "Instructions document error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        ErrorResponse::with_details(
                            "Cannot access instructions document",
                            other.to_string(),
                        ),
                    )
                }
            },
            ApiError::Unsupported(msg) => (
                StatusCode::NOT_IMPLEMENTED,
                ErrorResponse::new(msg.clone()),
            ),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse::new(msg.clone()),
                )
            }
        };
        (status, Json(error_response)).into_response()
    }
}
