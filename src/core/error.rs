//! Error type for the QA Learning API
//!
//! Every failure is converted at the handler boundary into an HTTP status with
//! a short plain-text body. Internal details are logged, never returned.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Main error type for the service
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// No credential was presented
    #[error("Unauthorized")]
    Unauthorized,

    /// A credential was presented but could not be verified
    #[error("Forbidden")]
    Forbidden,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("{0}")]
    NotFound(String),
}

impl ApiError {
    /// Shorthand for the not-found outcome shared by every by-id route
    pub fn user_not_found() -> Self {
        ApiError::NotFound("User not found".to_string())
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized | ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error type name used in log records
    pub fn error_type(&self) -> &'static str {
        match self {
            ApiError::Internal(_) => "InternalError",
            ApiError::InvalidRequest(_) => "InvalidRequest",
            ApiError::Unauthorized => "Unauthorized",
            ApiError::Forbidden => "Forbidden",
            ApiError::InvalidCredentials => "InvalidCredentials",
            ApiError::NotFound(_) => "NotFound",
        }
    }

    /// Body returned to the client. Server-side failures are masked.
    pub fn public_message(&self) -> String {
        match self {
            ApiError::Internal(_) => "Internal Server Error".to_string(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = self.status_code();

        if status_code.is_server_error() {
            tracing::error!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request failed: {}",
                self
            );
        } else {
            tracing::warn!(
                error_type = self.error_type(),
                status_code = %status_code,
                "Request rejected: {}",
                self
            );
        }

        (status_code, self.public_message()).into_response()
    }
}

/// Result type alias for operations that can fail with ApiError
pub type Result<T> = std::result::Result<T, ApiError>;
