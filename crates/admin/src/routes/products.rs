//! Product moderation route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::instrument;
use uuid::Uuid;

use mboa_market_core::{Price, ProductId, UserId};

use crate::api::types::PendingProduct;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Pending product row for the moderation queue.
#[derive(Debug, Serialize)]
pub struct PendingProductView {
    pub id: ProductId,
    pub seller_id: UserId,
    pub title: String,
    pub price: String,
    pub category: Option<String>,
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<&PendingProduct> for PendingProductView {
    fn from(product: &PendingProduct) -> Self {
        Self {
            id: product.id,
            seller_id: product.seller_id,
            title: product.title.clone(),
            price: Price::fcfa(product.price).to_string(),
            category: product.category.clone(),
            image_urls: product.image_urls.clone(),
            created_at: product.created_at,
        }
    }
}

/// Products awaiting moderation.
#[instrument(skip(state, admin))]
pub async fn pending(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<PendingProductView>>> {
    let products = state.market().pending_products(&admin.token).await?;
    Ok(Json(products.iter().map(PendingProductView::from).collect()))
}

/// Approve a pending product.
#[instrument(skip(state, admin))]
pub async fn approve(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let product = state
        .market()
        .approve_product(&admin.token, ProductId::new(id))
        .await?;

    tracing::info!(product_id = %product.id, "Product approved");

    Ok(Json(json!({
        "success": true,
        "message": "Product approved",
        "product": PendingProductView::from(&product),
    })))
}

/// Reject a pending product.
#[instrument(skip(state, admin))]
pub async fn reject(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>> {
    let product = state
        .market()
        .reject_product(&admin.token, ProductId::new(id))
        .await?;

    tracing::info!(product_id = %product.id, "Product rejected");

    Ok(Json(json!({
        "success": true,
        "message": "Product rejected",
        "product": PendingProductView::from(&product),
    })))
}
