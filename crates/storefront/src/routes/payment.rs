//! Payment route handlers.
//!
//! `start` initiates payment for the order recorded at checkout; `status`
//! is a single caller-driven check; `wait` holds the request open through
//! a bounded poll. A shopper navigating away simply disconnects - the
//! dropped future abandons the poll, nothing else cancels it.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use mboa_market_core::{OrderId, PaymentStatus, TransactionRef};

use crate::api::types::{OrderResponse, PaymentRequest, PaymentResponse};
use crate::error::{AppError, Result};
use crate::models::storage_keys;
use crate::payment::{PaymentFlow, PaymentPhase, WAIT_INTERVAL, WAIT_MAX_CHECKS};
use crate::routes::format_price;
use crate::state::AppState;

/// Payment display data.
#[derive(Debug, Serialize)]
pub struct PaymentView {
    pub order_id: OrderId,
    pub transaction_id: TransactionRef,
    pub status: PaymentStatus,
    pub phase: PaymentPhase,
    pub amount: String,
    /// Present when the gateway hosts the payment page; the client
    /// redirects there.
    pub payment_link: Option<String>,
}

impl PaymentView {
    fn new(response: PaymentResponse, phase: PaymentPhase) -> Self {
        Self {
            order_id: response.order_id,
            transaction_id: response.transaction_id,
            status: response.status,
            phase,
            amount: format_price(&response.amount),
            payment_link: response.payment_link,
        }
    }
}

/// Status check query parameters.
#[derive(Debug, Deserialize)]
pub struct StatusQuery {
    pub transaction_id: String,
}

/// Initiate payment for the current order.
///
/// Reads the order recorded at checkout; a missing record means checkout
/// never completed, and the shopper is sent back to the catalog.
#[instrument(skip(state, session))]
pub async fn start(State(state): State<AppState>, session: Session) -> Result<Json<PaymentView>> {
    let Some(order) = session
        .get::<OrderResponse>(storage_keys::CURRENT_ORDER)
        .await?
    else {
        return Err(AppError::BadRequest(
            "No order is awaiting payment".to_string(),
        ));
    };

    let request = PaymentRequest {
        order_id: order.id,
        name: order.customer_name.clone(),
        phone: order.customer_phone.clone(),
        redirect_url: Some(format!("{}/payment/status", state.config().base_url)),
    };

    let flow = PaymentFlow::new(state.market().clone());
    let (response, phase) = flow.start(&request).await?;

    tracing::info!(
        order_id = %order.id,
        transaction_id = %response.transaction_id,
        status = %response.status,
        "Payment initiated"
    );

    Ok(Json(PaymentView::new(response, phase)))
}

/// One status check; the result directly drives the client's state.
#[instrument(skip(state))]
pub async fn status(
    State(state): State<AppState>,
    Query(query): Query<StatusQuery>,
) -> Result<Json<PaymentView>> {
    let transaction_id = TransactionRef::new(query.transaction_id);
    let flow = PaymentFlow::new(state.market().clone());
    let (response, phase) = flow.check(&transaction_id).await?;

    Ok(Json(PaymentView::new(response, phase)))
}

/// Bounded wait for a terminal status.
///
/// Checks at a fixed interval until completed/failed or the attempt budget
/// runs out, then reports the last observation.
#[instrument(skip(state))]
pub async fn wait(
    State(state): State<AppState>,
    Path(transaction_id): Path<String>,
) -> Result<Json<PaymentView>> {
    let transaction_id = TransactionRef::new(transaction_id);
    let flow = PaymentFlow::new(state.market().clone());
    let (response, phase) = flow
        .wait_for_terminal(&transaction_id, WAIT_INTERVAL, WAIT_MAX_CHECKS)
        .await?;

    Ok(Json(PaymentView::new(response, phase)))
}
