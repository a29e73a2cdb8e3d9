//! Unified error handling with Sentry integration.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::ApiError;

/// Application-level error type for the admin dashboard.
#[derive(Debug, Error)]
pub enum AppError {
    /// Market API operation failed.
    #[error("Market API error: {0}")]
    Api(#[from] ApiError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// User is not authenticated as an admin.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        let server_error = match &self {
            Self::Session(_) | Self::Internal(_) => true,
            Self::Api(api) => !matches!(api, ApiError::Rejected(_)),
            Self::Unauthorized(_) | Self::BadRequest(_) => false,
        };
        if server_error {
            let event_id = sentry::capture_error(&self);
            tracing::error!(error = %self, sentry_event_id = %event_id, "Request error");
        }

        let status = match &self {
            Self::Api(ApiError::Rejected(_)) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Api(_) => StatusCode::BAD_GATEWAY,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        };

        let message = match &self {
            Self::Api(ApiError::Rejected(message)) => message.clone(),
            Self::Api(_) => "The market service is unavailable. Please try again.".to_string(),
            Self::Session(_) | Self::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Unauthorized(message) | Self::BadRequest(message) => message.clone(),
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
