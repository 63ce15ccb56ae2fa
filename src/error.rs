/// Unified error types for the CCIP-Read gateway
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::name::ParseError;

/// Main error type for the gateway
#[derive(Error, Debug)]
pub enum GatewayError {
    /// Sender path segment or body field is not a 20-byte hex address
    #[error("Invalid sender address: {0}")]
    InvalidSender(String),

    /// Calldata could not be decoded (bad hex/base64, bad ABI, bad DNS name)
    #[error("Invalid calldata: {0}")]
    InvalidCalldata(String),

    /// Inner (or outer) function selector is not one the gateway serves
    #[error("Unsupported function: {0}")]
    UnsupportedFunction(String),

    /// Malformed request body or parameters
    #[error("Validation error: {0}")]
    Validation(String),

    /// Name could not be parsed
    #[error("Name error: {0}")]
    Name(#[from] ParseError),

    /// Chain RPC, directory or profile store failure
    #[error("Backend error: {0}")]
    Backend(String),

    /// Whole-request deadline exceeded
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Signing key or signature failure
    #[error("Signing error: {0}")]
    Signing(String),

    /// Startup configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal server errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl GatewayError {
    /// Short machine-readable code, also used as the metrics label
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::InvalidSender(_) => "InvalidSender",
            GatewayError::InvalidCalldata(_) | GatewayError::Name(_) => "InvalidCalldata",
            GatewayError::UnsupportedFunction(_) => "UnsupportedFunction",
            GatewayError::Validation(_) => "InvalidRequest",
            _ => "InternalServerError",
        }
    }

    /// HTTP status the error maps to
    pub fn status(&self) -> StatusCode {
        match self {
            GatewayError::InvalidSender(_)
            | GatewayError::InvalidCalldata(_)
            | GatewayError::Name(_)
            | GatewayError::UnsupportedFunction(_)
            | GatewayError::Validation(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Convert GatewayError to HTTP response
impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            "Internal server error".to_string() // Don't leak details
        } else {
            self.to_string()
        };

        let body = Json(ErrorResponse {
            error: self.code().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

/// Result type alias for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;
