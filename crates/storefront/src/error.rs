//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures server-class errors to
//! Sentry before responding. All route handlers return
//! `Result<T, AppError>`; bodies use the same `{success, message}` envelope
//! the market API speaks, which the client surfaces as a toast or inline
//! message.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::api::ApiError;
use crate::cart::CartLoadError;
use crate::checkout::CheckoutError;
use crate::services::ModerationError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Market API operation failed.
    #[error("Market API error: {0}")]
    Api(#[from] ApiError),

    /// Moderation service operation failed.
    #[error("Moderation error: {0}")]
    Moderation(#[from] ModerationError),

    /// Checkout validation rejected the submission.
    #[error("Checkout error: {0}")]
    Checkout(#[from] CheckoutError),

    /// Persisted cart could not be read.
    #[error("Cart error: {0}")]
    Cart(#[from] CartLoadError),

    /// Session store operation failed.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// User is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Whether this error is server-class and worth a Sentry event.
    fn is_server_error(&self) -> bool {
        match self {
            Self::Session(_) | Self::Internal(_) => true,
            Self::Api(api) => !matches!(api, ApiError::Rejected(_) | ApiError::NotFound(_)),
            Self::Moderation(_) => true,
            Self::Checkout(_) | Self::Cart(_) | Self::NotFound(_) | Self::Unauthorized(_)
            | Self::BadRequest(_) => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_server_error() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Api(api) => match api {
                ApiError::Rejected(_) => StatusCode::BAD_REQUEST,
                ApiError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_GATEWAY,
            },
            Self::Moderation(_) => StatusCode::BAD_GATEWAY,
            Self::Checkout(_) | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            // A corrupt cart is recovered everywhere it matters; reaching
            // here still must not read as the shopper's fault
            Self::Cart(_) | Self::Session(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Session(_) | Self::Cart(_) | Self::Internal(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Self::Api(api) => match api {
                ApiError::Rejected(message) => message.clone(),
                ApiError::NotFound(what) => format!("{what} not found"),
                _ => "The market service is unavailable. Please try again.".to_string(),
            },
            Self::Moderation(_) => {
                "Image screening is unavailable. Please try again.".to_string()
            }
            // Inline validation messages go out verbatim
            Self::Checkout(e) => e.to_string(),
            Self::NotFound(what) => format!("Not found: {what}"),
            Self::Unauthorized(message) | Self::BadRequest(message) => message.clone(),
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn get_status(err: AppError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("product-123".to_string());
        assert_eq!(err.to_string(), "Not found: product-123");

        let err = AppError::BadRequest("invalid input".to_string());
        assert_eq!(err.to_string(), "Bad request: invalid input");
    }

    #[test]
    fn test_app_error_status_codes() {
        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::BadRequest("test".to_string())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Internal("test".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_checkout_validation_is_bad_request() {
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::EmptyCart)),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Checkout(CheckoutError::MissingField("City"))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_api_rejection_is_bad_request() {
        assert_eq!(
            get_status(AppError::Api(ApiError::Rejected("Out of stock".to_string()))),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_api_transport_failure_is_bad_gateway() {
        assert_eq!(
            get_status(AppError::Api(ApiError::Api {
                status: 500,
                message: "boom".to_string(),
            })),
            StatusCode::BAD_GATEWAY
        );
    }
}
