//! HTTP error responses
//!
//! Every failure leaves as `{"error": message}`. Validation messages are
//! safe to echo; anything else is logged and replaced by the route's
//! generic message.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::errors::AppError;

/// Error body plus status
#[derive(Debug, Clone, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Endpoint not found")
    }

    /// Map a service error, hiding internals behind `generic`
    pub fn from_app(err: AppError, generic: &str) -> Self {
        Self::classify(err, generic, StatusCode::INTERNAL_SERVER_ERROR)
    }

    /// Like `from_app`, but upstream API failures become 502
    pub fn from_app_upstream(err: AppError, generic: &str) -> Self {
        Self::classify(err, generic, StatusCode::BAD_GATEWAY)
    }

    fn classify(err: AppError, generic: &str, upstream_status: StatusCode) -> Self {
        match err {
            AppError::Validation(message) => {
                warn!(reason = %message, "request rejected");
                Self::bad_request(message)
            }
            AppError::NoFineTunedModel => Self::new(StatusCode::CONFLICT, err.to_string()),
            AppError::Upstream(_) => {
                error!(error = %err, "{}", generic);
                Self::new(upstream_status, generic)
            }
            other => {
                error!(error = %other, "{}", generic);
                Self::new(StatusCode::INTERNAL_SERVER_ERROR, generic)
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
