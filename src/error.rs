use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::quota::ResourceKind;

/// Main application error type
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Authentication failed: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Invalid input: {0}")]
    BadRequest(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Quota policy unknown for {0}")]
    PolicyUnknown(ResourceKind),

    #[error("{resource} limit reached: used {used} of {limit}")]
    LimitReached {
        resource: ResourceKind,
        used: i64,
        limit: i64,
    },

    #[error("Upstream operation failed: {0}")]
    Upstream(String),

    #[error("Upstream operation timed out: {0}")]
    UpstreamTimeout(String),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error body returned by every failing endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource: Option<ResourceKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub used: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<i64>,
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) | Self::PolicyUnknown(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::LimitReached { .. } => StatusCode::TOO_MANY_REQUESTS,
            Self::Upstream(_) => StatusCode::BAD_GATEWAY,
            Self::UpstreamTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for clients
    pub fn code(&self) -> &'static str {
        match self {
            Self::Database(_) | Self::Internal(_) => "INTERNAL",
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::Forbidden(_) => "FORBIDDEN",
            Self::BadRequest(_) => "BAD_REQUEST",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::PolicyUnknown(_) => "POLICY_UNKNOWN",
            Self::LimitReached { .. } => "LIMIT_REACHED",
            Self::Upstream(_) => "UPSTREAM_FAILED",
            Self::UpstreamTimeout(_) => "UPSTREAM_TIMEOUT",
            Self::Unavailable(_) => "UNAVAILABLE",
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        let (resource, used, limit) = match self {
            Self::LimitReached {
                resource,
                used,
                limit,
            } => (Some(*resource), Some(*used), Some(*limit)),
            Self::PolicyUnknown(resource) => (Some(*resource), None, None),
            _ => (None, None, None),
        };

        ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
            resource,
            used,
            limit,
        }
    }
}

/// Implement IntoResponse for automatic conversion in handlers
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(
                error = %self,
                status = %status.as_u16(),
                "Request failed"
            );
        } else {
            tracing::warn!(
                error = %self,
                status = %status.as_u16(),
                code = self.code(),
                "Request rejected"
            );
        }

        (status, Json(self.to_response())).into_response()
    }
}

/// Custom result type for the application
pub type AppResult<T> = Result<T, AppError>;
