//! Auth and locale route handlers.
//!
//! Authentication itself is the market API's job; these handlers validate
//! what the forms must catch client-side (presence, numeric phone,
//! password confirmation), forward credentials, and keep the identity keys
//! in the session. Logging out removes only those keys - the cart stays.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use mboa_market_core::{Phone, UserId, UserRole};

use crate::api::types::{LoginRequest, RegisterRequest};
use crate::error::{AppError, Result};
use crate::middleware::auth::{clear_identity, set_identity};
use crate::models::{Identity, storage_keys};
use crate::state::AppState;

/// Supported locales.
const SUPPORTED_LANGS: &[&str] = &["en", "fr"];

/// Login form data.
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub phone: String,
    pub password: String,
    pub role: Option<UserRole>,
}

/// Registration form data.
#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    pub full_name: String,
    pub email: Option<String>,
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<UserRole>,
}

/// Locale form data.
#[derive(Debug, Deserialize)]
pub struct LangForm {
    pub lang: String,
}

/// Logged-in user display data.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub role: UserRole,
}

/// Log in with phone and password.
#[instrument(skip(state, session, form))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<LoginForm>,
) -> Result<Json<serde_json::Value>> {
    let phone = Phone::parse(form.phone.trim())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if form.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }

    let auth = state
        .market()
        .login(&LoginRequest {
            phone: phone.into_inner(),
            password: form.password,
            role: form.role,
        })
        .await?;

    let identity = Identity {
        user_id: auth.user.id,
        name: auth.user.full_name,
        role: auth.user.role,
        token: auth.token,
    };
    set_identity(&session, &identity).await?;

    tracing::info!(user_id = %identity.user_id, role = %identity.role, "Logged in");

    Ok(Json(json!({
        "success": true,
        "message": "Welcome back",
        "user": UserView {
            id: identity.user_id,
            name: identity.name,
            role: identity.role,
        },
    })))
}

/// Register a new account.
///
/// Password confirmation and numeric phone are checked here, before any
/// request leaves the process; mismatches surface inline.
#[instrument(skip(state, session, form))]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RegisterForm>,
) -> Result<Json<serde_json::Value>> {
    if form.full_name.trim().is_empty() {
        return Err(AppError::BadRequest("Full name is required".to_string()));
    }
    let phone = Phone::parse(form.phone.trim())
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    if form.password.is_empty() {
        return Err(AppError::BadRequest("Password is required".to_string()));
    }
    if form.password != form.confirm_password {
        return Err(AppError::BadRequest("Passwords do not match".to_string()));
    }

    let auth = state
        .market()
        .register(&RegisterRequest {
            full_name: form.full_name.trim().to_string(),
            email: form.email.filter(|e| !e.trim().is_empty()),
            phone: phone.into_inner(),
            password: form.password,
            role: form.role,
        })
        .await?;

    let identity = Identity {
        user_id: auth.user.id,
        name: auth.user.full_name,
        role: auth.user.role,
        token: auth.token,
    };
    set_identity(&session, &identity).await?;

    tracing::info!(user_id = %identity.user_id, role = %identity.role, "Registered");

    Ok(Json(json!({
        "success": true,
        "message": "Account created",
        "user": UserView {
            id: identity.user_id,
            name: identity.name,
            role: identity.role,
        },
    })))
}

/// Log out: removes the identity keys and nothing else.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<Json<serde_json::Value>> {
    clear_identity(&session).await?;
    Ok(Json(json!({ "success": true, "message": "Logged out" })))
}

/// Persist the locale preference.
#[instrument(skip(session))]
pub async fn set_lang(
    session: Session,
    Form(form): Form<LangForm>,
) -> Result<Json<serde_json::Value>> {
    if !SUPPORTED_LANGS.contains(&form.lang.as_str()) {
        return Err(AppError::BadRequest(format!(
            "Unsupported language: {}",
            form.lang
        )));
    }

    session.insert(storage_keys::LANG, &form.lang).await?;

    Ok(Json(json!({ "success": true, "message": "Language updated" })))
}
