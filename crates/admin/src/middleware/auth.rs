//! Admin authentication extractor.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::models::{CurrentAdmin, storage_keys};

/// Extractor that requires a logged-in admin.
///
/// The admin role was already verified at login; a session either carries
/// a full admin identity or none.
pub struct RequireAdmin(pub CurrentAdmin);

/// Error returned when admin authentication is missing.
pub struct AdminRejection;

impl IntoResponse for AdminRejection {
    fn into_response(self) -> Response {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "success": false, "message": "Admin login required" })),
        )
            .into_response()
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AdminRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let session = parts.extensions.get::<Session>().ok_or(AdminRejection)?;

        session
            .get::<CurrentAdmin>(storage_keys::CURRENT_ADMIN)
            .await
            .ok()
            .flatten()
            .map(Self)
            .ok_or(AdminRejection)
    }
}

/// Set the current admin in the session after a verified login.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_admin(
    session: &Session,
    admin: &CurrentAdmin,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(storage_keys::CURRENT_ADMIN, admin).await
}

/// Clear the current admin from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_admin(
    session: &Session,
) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentAdmin>(storage_keys::CURRENT_ADMIN)
        .await?;
    Ok(())
}
