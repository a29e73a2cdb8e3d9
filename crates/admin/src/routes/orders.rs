//! Order list route handler.

use axum::{Json, extract::State};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::instrument;

use mboa_market_core::{OrderId, OrderStatus, Price};

use crate::api::types::AdminOrder;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Order row for the admin order table.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub customer_name: String,
    pub customer_phone: String,
    pub status: OrderStatus,
    pub total: String,
    pub created_at: DateTime<Utc>,
}

impl From<&AdminOrder> for OrderView {
    fn from(order: &AdminOrder) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name.clone(),
            customer_phone: order.customer_phone.clone(),
            status: order.status,
            total: Price::fcfa(order.total).to_string(),
            created_at: order.created_at,
        }
    }
}

/// All marketplace orders.
#[instrument(skip(state, admin))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<Vec<OrderView>>> {
    let orders = state.market().orders(&admin.token).await?;
    Ok(Json(orders.iter().map(OrderView::from).collect()))
}
