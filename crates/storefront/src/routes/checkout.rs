//! Checkout route handlers.

use axum::{Form, Json, extract::State};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_sessions::Session;
use tracing::instrument;

use crate::api::types::PaymentMethod;
use crate::cart::{CartStore, ops};
use crate::checkout::{OrderDraft, SHIPPING_LABEL, ShippingForm};
use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::storage_keys;
use crate::routes::cart::CartItemView;
use crate::routes::format_price;
use crate::state::AppState;

/// Order summary shown on the checkout page.
///
/// Shipping is a fixed display label; the total is the item subtotal.
#[derive(Debug, Serialize)]
pub struct CheckoutSummary {
    pub items: Vec<CartItemView>,
    pub item_count: u32,
    pub subtotal: String,
    pub shipping: &'static str,
    pub total: String,
}

/// Checkout form: shipping fields plus the selected payment method.
#[derive(Debug, Deserialize)]
pub struct CheckoutForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub city: String,
    pub region: String,
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    fn into_parts(self) -> (ShippingForm, PaymentMethod) {
        (
            ShippingForm {
                customer_name: self.customer_name,
                customer_phone: self.customer_phone,
                delivery_address: self.delivery_address,
                city: self.city,
                region: self.region,
            },
            self.payment_method,
        )
    }
}

/// Checkout order summary.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CheckoutSummary> {
    let lines = CartStore::new(session, state.cart_events().clone())
        .load_or_empty()
        .await;
    let subtotal = ops::subtotal(&lines);

    Json(CheckoutSummary {
        items: lines.iter().map(CartItemView::from).collect(),
        item_count: ops::badge_count(&lines),
        subtotal: format_price(&subtotal),
        shipping: SHIPPING_LABEL,
        // No shipping fee, no tax: the total is the item sum
        total: format_price(&subtotal),
    })
}

/// Assemble and submit the order.
///
/// Validation failures reject the submission before any request leaves the
/// process. On success the order snapshot overwrites `currentOrder` and
/// the client moves on to the payment step; on failure the shopper stays
/// on the form. The cart is untouched on both paths.
#[instrument(skip(state, identity, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    RequireUser(identity): RequireUser,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Json<serde_json::Value>> {
    let store = CartStore::new(session.clone(), state.cart_events().clone());
    let lines = store.load_or_empty().await;

    let (shipping, payment_method) = form.into_parts();
    let draft = OrderDraft::assemble(&lines, shipping, payment_method)?;

    let order = state
        .market()
        .create_order(&identity.token, &draft.into_request())
        .await?;

    // One storage key, overwritten on every checkout
    session.insert(storage_keys::CURRENT_ORDER, &order).await?;

    tracing::info!(order_id = %order.id, total = %order.total, "Order placed");

    Ok(Json(json!({
        "success": true,
        "message": "Order placed",
        "order_id": order.id,
        "total": format_price(&order.total),
        "next": "/payment/start",
    })))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_form_splits_into_shipping_and_method() {
        let form = CheckoutForm {
            customer_name: "Ngono Marie".to_string(),
            customer_phone: "675123456".to_string(),
            delivery_address: "Rue 1.234".to_string(),
            city: "Yaoundé".to_string(),
            region: "Centre".to_string(),
            payment_method: PaymentMethod::MobileMoney,
        };

        let (shipping, method) = form.into_parts();
        assert_eq!(shipping.city, "Yaoundé");
        assert_eq!(method, PaymentMethod::MobileMoney);
    }

    #[test]
    fn test_checkout_form_deserializes_urlencoded() {
        let form: CheckoutForm = serde_urlencoded::from_str(
            "customer_name=Ngono+Marie&customer_phone=675123456\
             &delivery_address=Rue+1.234&city=Yaound%C3%A9&region=Centre\
             &payment_method=mobileMoney",
        )
        .unwrap();

        assert_eq!(form.customer_name, "Ngono Marie");
        assert_eq!(form.payment_method, PaymentMethod::MobileMoney);
    }
}
