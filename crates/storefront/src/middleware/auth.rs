//! Authentication extractors.
//!
//! The logged-in identity is assembled from the session's separate
//! `token` / `userId` / `userRole` / `userName` keys (see
//! [`crate::models::storage_keys`]). Note what this deliberately does NOT
//! touch: the cart. Logging in, out, or switching accounts rewrites only
//! the identity keys, so the cart persists across account switches on the
//! same browser - a known quirk carried over from the storage contract.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use mboa_market_core::{UserId, UserRole};

use crate::models::{Identity, storage_keys};

/// Extractor that requires a logged-in user.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireUser(identity): RequireUser,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", identity.name)
/// }
/// ```
pub struct RequireUser(pub Identity);

/// Extractor that requires a logged-in vendor.
pub struct RequireVendor(pub Identity);

/// Extractor that optionally gets the current user.
///
/// Unlike [`RequireUser`], this does not reject the request when nobody is
/// logged in.
pub struct OptionalUser(pub Option<Identity>);

/// Error returned when authentication is required but missing.
pub enum AuthRejection {
    /// Not logged in.
    Unauthorized,
    /// Logged in, but the role does not allow this surface.
    Forbidden,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "Please log in to continue"),
            Self::Forbidden => (StatusCode::FORBIDDEN, "This area is for vendors"),
        };
        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}

impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .ok_or(AuthRejection::Unauthorized)?;

        load_identity(session)
            .await
            .map(Self)
            .ok_or(AuthRejection::Unauthorized)
    }
}

impl<S> FromRequestParts<S> for RequireVendor
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireUser(identity) = RequireUser::from_request_parts(parts, state).await?;
        if !identity.is_vendor() {
            return Err(AuthRejection::Forbidden);
        }
        Ok(Self(identity))
    }
}

impl<S> FromRequestParts<S> for OptionalUser
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let identity = match parts.extensions.get::<Session>() {
            Some(session) => load_identity(session).await,
            None => None,
        };

        Ok(Self(identity))
    }
}

/// Assemble the identity from the session's separate keys.
///
/// All four parts must be present; anything less counts as logged out.
pub async fn load_identity(session: &Session) -> Option<Identity> {
    let token = session
        .get::<String>(storage_keys::TOKEN)
        .await
        .ok()
        .flatten()?;
    let user_id = session
        .get::<UserId>(storage_keys::USER_ID)
        .await
        .ok()
        .flatten()?;
    let role = session
        .get::<UserRole>(storage_keys::USER_ROLE)
        .await
        .ok()
        .flatten()?;
    let name = session
        .get::<String>(storage_keys::USER_NAME)
        .await
        .ok()
        .flatten()?;

    Some(Identity {
        user_id,
        name,
        role,
        token,
    })
}

/// Write the identity keys after a successful login or registration.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_identity(
    session: &Session,
    identity: &Identity,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(storage_keys::TOKEN, &identity.token).await?;
    session.insert(storage_keys::USER_ID, identity.user_id).await?;
    session.insert(storage_keys::USER_ROLE, identity.role).await?;
    session.insert(storage_keys::USER_NAME, &identity.name).await?;
    Ok(())
}

/// Remove the identity keys (logout). Leaves every other key - including
/// the cart - in place.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_identity(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session.remove::<String>(storage_keys::TOKEN).await?;
    session.remove::<UserId>(storage_keys::USER_ID).await?;
    session.remove::<UserRole>(storage_keys::USER_ROLE).await?;
    session.remove::<String>(storage_keys::USER_NAME).await?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use tower_sessions::MemoryStore;
    use uuid::Uuid;

    fn memory_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn identity(role: UserRole) -> Identity {
        Identity {
            user_id: UserId::new(Uuid::new_v4()),
            name: "Ngono Marie".to_string(),
            role,
            token: "bearer-token".to_string(),
        }
    }

    #[tokio::test]
    async fn test_identity_roundtrip() {
        let session = memory_session();
        let original = identity(UserRole::Buyer);

        set_identity(&session, &original).await.unwrap();
        let loaded = load_identity(&session).await.unwrap();

        assert_eq!(loaded.user_id, original.user_id);
        assert_eq!(loaded.name, original.name);
        assert_eq!(loaded.role, original.role);
        assert_eq!(loaded.token, original.token);
    }

    #[tokio::test]
    async fn test_missing_any_key_means_logged_out() {
        let session = memory_session();
        set_identity(&session, &identity(UserRole::Buyer)).await.unwrap();

        session
            .remove::<UserRole>(storage_keys::USER_ROLE)
            .await
            .unwrap();

        assert!(load_identity(&session).await.is_none());
    }

    #[tokio::test]
    async fn test_clear_identity_leaves_other_keys() {
        let session = memory_session();
        set_identity(&session, &identity(UserRole::Buyer)).await.unwrap();
        session
            .insert(storage_keys::LANG, "fr".to_string())
            .await
            .unwrap();

        clear_identity(&session).await.unwrap();

        assert!(load_identity(&session).await.is_none());
        let lang: Option<String> = session.get(storage_keys::LANG).await.unwrap();
        assert_eq!(lang.as_deref(), Some("fr"));
    }

    #[tokio::test]
    async fn test_vendor_check() {
        assert!(identity(UserRole::Vendor).is_vendor());
        assert!(!identity(UserRole::Buyer).is_vendor());
    }
}
