//! Cart route handlers.
//!
//! Mutation responses carry an `HX-Trigger: cart-updated` header so sibling
//! views refresh their fragments; the badge itself converges through the
//! SSE feed at `/cart/events` - no polling anywhere.

use std::convert::Infallible;

use async_stream::stream;
use axum::{
    Form, Json,
    extract::State,
    response::{
        AppendHeaders, IntoResponse,
        sse::{Event, KeepAlive, Sse},
    },
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;
use uuid::Uuid;

use mboa_market_core::ProductId;

use crate::cart::{CartLine, CartStore, ops};
use crate::error::Result;
use crate::routes::format_price;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartItemView {
    pub id: ProductId,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
    pub category: String,
    pub image: String,
    pub return_policy: String,
}

impl From<&CartLine> for CartItemView {
    fn from(line: &CartLine) -> Self {
        Self {
            id: line.product_id,
            name: line.name.clone(),
            quantity: line.quantity,
            price: format_price(&line.unit_price),
            line_price: format_price(&line.line_total()),
            category: line.category.clone(),
            image: line.image_ref.clone(),
            return_policy: line.return_policy_text.clone(),
        }
    }
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub subtotal: String,
    pub item_count: u32,
}

impl CartView {
    fn from_lines(lines: &[CartLine]) -> Self {
        Self {
            items: lines.iter().map(CartItemView::from).collect(),
            subtotal: format_price(&ops::subtotal(lines)),
            item_count: ops::badge_count(lines),
        }
    }
}

/// Cart count badge data.
#[derive(Debug, Clone, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: Uuid,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: Uuid,
    pub quantity: u32,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: Uuid,
}

fn cart_store(state: &AppState, session: Session) -> CartStore {
    CartStore::new(session, state.cart_events().clone())
}

/// Cart contents.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let lines = cart_store(&state, session).load_or_empty().await;
    Json(CartView::from_lines(&lines))
}

/// Add a product to the cart.
///
/// Fetches the product to snapshot its display fields at add time, then
/// persists. Returns the new badge count with a trigger to update sibling
/// views.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<impl IntoResponse> {
    let product = state
        .market()
        .get_product(ProductId::new(form.product_id))
        .await?;

    let store = cart_store(&state, session);
    let lines = store.add_item(&product, form.quantity.unwrap_or(1)).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        Json(CartCount {
            count: ops::badge_count(&lines),
        }),
    ))
}

/// Set a line's quantity (0 removes the line).
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Result<impl IntoResponse> {
    let store = cart_store(&state, session);
    let lines = store
        .update_quantity(ProductId::new(form.product_id), form.quantity)
        .await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        Json(CartView::from_lines(&lines)),
    ))
}

/// Remove a line from the cart.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<impl IntoResponse> {
    let store = cart_store(&state, session);
    let lines = store.remove_item(ProductId::new(form.product_id)).await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        Json(CartView::from_lines(&lines)),
    ))
}

/// Clear the cart. This is the only path that empties it - placing an
/// order does not.
#[instrument(skip(state, session))]
pub async fn clear(
    State(state): State<AppState>,
    session: Session,
) -> Result<impl IntoResponse> {
    cart_store(&state, session).clear().await?;

    Ok((
        AppendHeaders([("HX-Trigger", "cart-updated")]),
        Json(CartCount { count: 0 }),
    ))
}

/// Current badge count.
#[instrument(skip(state, session))]
pub async fn count(State(state): State<AppState>, session: Session) -> Json<CartCount> {
    let count = cart_store(&state, session).count().await;
    Json(CartCount { count })
}

/// Badge count feed (SSE).
///
/// Emits the current count immediately, then one event per persisted cart
/// mutation in this session - from any tab. Disconnecting unsubscribes;
/// the channel is reaped once its last watcher is gone.
#[instrument(skip(state, session))]
pub async fn events(
    State(state): State<AppState>,
    session: Session,
) -> Result<Sse<impl futures::Stream<Item = std::result::Result<Event, Infallible>>>> {
    let store = cart_store(&state, session);
    let initial = store.count().await;
    let channel = store.channel().await?;
    let mut rx = state.cart_events().subscribe(channel, initial);

    let feed = stream! {
        yield Ok(Event::default().event("cart-count").data(initial.to_string()));

        while rx.changed().await.is_ok() {
            let count = *rx.borrow_and_update();
            yield Ok(Event::default().event("cart-count").data(count.to_string()));
        }
    };

    Ok(Sse::new(feed).keep_alive(KeepAlive::default()))
}
