//! Admin auth route handlers.

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use mboa_market_core::UserRole;

use crate::api::types::LoginRequest;
use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_current_admin, set_current_admin};
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
}

/// Admin login.
///
/// Credentials go to the shared user endpoint with the admin role; an
/// account that authenticates but is not an admin is rejected here, before
/// any identity lands in the session.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<serde_json::Value>> {
    if form.phone.trim().is_empty() || form.password.is_empty() {
        return Err(AppError::BadRequest(
            "Phone and password are required".to_string(),
        ));
    }

    let auth = state
        .market()
        .login(&LoginRequest {
            phone: form.phone.trim().to_string(),
            password: form.password,
            role: UserRole::Admin,
        })
        .await?;

    if auth.user.role != UserRole::Admin {
        return Err(AppError::Unauthorized(
            "This account is not an admin".to_string(),
        ));
    }

    let admin = CurrentAdmin {
        user_id: auth.user.id,
        name: auth.user.full_name,
        token: auth.token,
    };
    set_current_admin(&session, &admin).await?;

    tracing::info!(user_id = %admin.user_id, "Admin logged in");

    Ok(Json(json!({
        "success": true,
        "message": "Welcome back",
        "name": admin.name,
    })))
}

/// Admin logout.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_current_admin(&session).await?;
    Ok(Json(json!({ "success": true, "message": "Logged out" })))
}
