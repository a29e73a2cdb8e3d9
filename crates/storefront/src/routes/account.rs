//! Account route handlers.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use mboa_market_core::{OrderId, OrderStatus};

use crate::api::types::OrderResponse;
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::routes::format_price;
use crate::state::AppState;

/// Order row for the shopper's order history.
#[derive(Debug, Serialize)]
pub struct OrderSummaryView {
    pub id: OrderId,
    pub status: OrderStatus,
    pub total: String,
    pub line_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderResponse> for OrderSummaryView {
    fn from(order: &OrderResponse) -> Self {
        Self {
            id: order.id,
            status: order.status,
            total: format_price(&order.total),
            line_count: order.items.len(),
            created_at: order.created_at,
        }
    }
}

/// The shopper's order history (the API scopes by token).
#[instrument(skip(state, identity))]
pub async fn orders(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
) -> Result<Json<Vec<OrderSummaryView>>> {
    let orders = state.market().list_orders(&identity.token).await?;
    Ok(Json(orders.iter().map(OrderSummaryView::from).collect()))
}
