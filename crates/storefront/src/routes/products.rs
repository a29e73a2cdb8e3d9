//! Catalog route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;

use mboa_market_core::{ProductId, UserId};

use crate::api::types::{Product, ProductFilter};
use crate::error::Result;
use crate::routes::format_price;
use crate::state::AppState;

/// Product display data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductView {
    pub id: ProductId,
    pub seller_id: UserId,
    pub title: String,
    pub description: Option<String>,
    pub price: String,
    pub category: Option<String>,
    pub image_urls: Vec<String>,
    pub return_policy: Option<String>,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            seller_id: product.seller_id,
            title: product.title.clone(),
            description: product.description.clone(),
            price: format_price(&product.price),
            category: product.category.clone(),
            image_urls: product.image_urls.clone(),
            return_policy: product.return_policy.clone(),
        }
    }
}

/// Catalog listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
    pub seller_id: Option<UserId>,
}

/// Catalog listing, optionally filtered by category or seller.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let filter = ProductFilter {
        category: query.category,
        seller_id: query.seller_id,
    };

    let products = state.market().list_products(&filter).await?;

    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// Product detail.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ProductView>> {
    let product = state.market().get_product(ProductId::new(id)).await?;
    Ok(Json(ProductView::from(&product)))
}
