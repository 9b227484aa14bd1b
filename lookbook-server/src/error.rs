//! API error handling module
//!
//! Provides a unified error type for all API endpoints with structured error variants.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use lookbook_core::LookbookError;
use thiserror::Error;

/// API error type with structured variants for different error categories
#[derive(Debug, Error)]
pub enum ApiError {
    /// Bad request - client provided invalid input
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error - unexpected server-side failure
    #[error("Internal error: {0}")]
    Internal(String),

    /// Core library error
    #[error("Lookbook error: {0}")]
    Lookbook(#[from] LookbookError),
}

impl ApiError {
    /// Create a bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    /// Create an internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Lookbook(ref e) => match e {
                LookbookError::DecodeFailed(_) => StatusCode::UNPROCESSABLE_ENTITY,
                LookbookError::InvalidSignature(_) => StatusCode::BAD_REQUEST,
                LookbookError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
        }
    }

    /// Get the error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "INVALID_INPUT",
            Self::Internal(_) => "INTERNAL_ERROR",
            Self::Lookbook(ref e) => match e {
                LookbookError::DecodeFailed(_) => "DECODE_FAILED",
                LookbookError::InvalidSignature(_) => "INVALID_SIGNATURE",
                LookbookError::Storage(_) => "STORAGE_UNAVAILABLE",
            },
        }
    }

    /// Get sanitized error message for client response
    fn client_message(&self) -> String {
        match self {
            // Storage details may carry connection strings or SQL
            Self::Lookbook(LookbookError::Storage(_)) => "Catalog is unavailable".to_string(),
            Self::Lookbook(LookbookError::DecodeFailed(_)) => "Could not process image".to_string(),
            Self::Internal(_) => "Internal server error".to_string(),
            _ => self.to_string(),
        }
    }

    /// Get the error category for logging
    fn error_category(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Internal(_) => "internal",
            Self::Lookbook(_) => "lookbook",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.error_category();
        let code = self.error_code();
        let internal_message = self.to_string();
        let client_message = self.client_message();

        // 5xx caused by us is an error; client mistakes and an unreachable catalog are warnings
        let is_fault = matches!(self, Self::Internal(_))
            || matches!(self, Self::Lookbook(ref e) if !matches!(e, LookbookError::Storage(_)));

        if is_fault {
            tracing::error!(
                status = %status,
                category,
                code,
                error = %internal_message,
                client_message = %client_message,
                "Request failed"
            );
        } else {
            tracing::warn!(
                status = %status,
                category,
                code,
                error = %internal_message,
                "Request rejected"
            );
        }

        let body = serde_json::json!({
            "error": client_message,
            "code": code,
        });

        (status, Json(body)).into_response()
    }
}
