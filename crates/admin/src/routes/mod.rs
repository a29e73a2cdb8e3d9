//! HTTP route handlers for the admin dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Health check
//!
//! POST /auth/login               - Admin login (role-checked)
//! POST /auth/logout              - Logout
//!
//! GET  /dashboard                - Metrics, trends, conversion, categories,
//!                                  recent activities in one view
//! GET  /orders                   - All marketplace orders
//! GET  /products/pending         - Products awaiting moderation
//! POST /products/{id}/approve    - Approve a product
//! POST /products/{id}/reject     - Reject a product
//! ```

pub mod auth;
pub mod dashboard;
pub mod orders;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the admin dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route("/dashboard", get(dashboard::show))
        .route("/orders", get(orders::index))
        .route("/products/pending", get(products::pending))
        .route("/products/{id}/approve", post(products::approve))
        .route("/products/{id}/reject", post(products::reject))
}
