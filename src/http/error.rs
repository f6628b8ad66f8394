//! Request-time error taxonomy.
//!
//! # Design Decisions
//! - Every variant maps to exactly one HTTP status
//! - Error bodies are JSON: `{"error": <reason>, "message": <detail>}`
//! - Internal failures are logged in full but answered with a fixed message

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Errors a request handler can surface to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No route, collection or record matched.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request body could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The request body exceeded the configured limit.
    #[error("request body exceeds the configured limit")]
    PayloadTooLarge,

    /// Unexpected failure while handling the request.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to the client.
    pub fn client_message(&self) -> String {
        match self {
            ApiError::NotFound(detail) | ApiError::BadRequest(detail) => detail.clone(),
            ApiError::PayloadTooLarge => self.to_string(),
            ApiError::Internal(_) => "internal server error".to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let ApiError::Internal(detail) = &self {
            tracing::error!(error = %detail, "Handler failed");
        }

        let body = json!({
            "error": status.canonical_reason().unwrap_or("Error"),
            "message": self.client_message(),
        });
        (status, Json(body)).into_response()
    }
}
