//! HTTP error responses.
//!
//! Every error body has the shape `{"error": {"category": ..., "message": ...}}`,
//! the same shape the auth middleware uses for rejected tokens.

use axum::Json;
use axum::response::{IntoResponse, Response};
use http::StatusCode;
use serde::Serialize;
use thiserror::Error;
use warden_accounts::AccountError;

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, ApiError>;

/// An error returned by a handler.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {message}")]
pub struct ApiError {
    /// Response status.
    pub status: StatusCode,
    /// Short machine-readable category.
    pub category: &'static str,
    /// Human-readable message.
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: ErrorDetail<'a>,
}

#[derive(Serialize)]
struct ErrorDetail<'a> {
    category: &'a str,
    message: &'a str,
}

impl ApiError {
    /// Create an error.
    pub fn new(status: StatusCode, category: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            category,
            message: message.into(),
        }
    }

    /// 401 for requests without a session.
    pub fn unauthenticated() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            "unauthenticated",
            "authentication required",
        )
    }

    /// 403 for callers lacking a privilege.
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, "unauthorized", message)
    }

    /// 404.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found", message)
    }

    /// 500. The detail is logged, not returned.
    pub fn internal(detail: impl std::fmt::Display) -> Self {
        tracing::error!(error = %detail, "Internal error");
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal",
            "internal error",
        )
    }

    /// Map an account error, given whether the request carried a session.
    ///
    /// `Unauthorized` becomes 401 without a session and 403 with one.
    pub fn from_account(err: AccountError, has_session: bool) -> Self {
        let status = match &err {
            AccountError::Unauthorized(_) if !has_session => return Self::unauthenticated(),
            AccountError::Unauthorized(_) => StatusCode::FORBIDDEN,
            AccountError::NotFound(_) => StatusCode::NOT_FOUND,
            AccountError::Conflict(_) => StatusCode::CONFLICT,
            AccountError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => return Self::internal(&err),
        };
        Self::new(status, err.category(), err.message())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: ErrorDetail {
                category: self.category,
                message: &self.message,
            },
        };
        (self.status, Json(body)).into_response()
    }
}
