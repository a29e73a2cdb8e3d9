//! HTTP route handlers for the storefront.
//!
//! Handlers return JSON view-models (and SSE for the cart badge feed);
//! rendering is the client's job.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Home view (featured products, categories)
//! GET  /health                  - Health check
//!
//! # Products
//! GET  /products                - Catalog listing (?category=&seller_id=)
//! GET  /products/{id}           - Product detail
//!
//! # Cart
//! GET  /cart                    - Cart contents
//! POST /cart/add                - Add product (triggers cart-updated)
//! POST /cart/update             - Set line quantity (0 removes)
//! POST /cart/remove             - Remove line
//! POST /cart/clear              - Clear the cart (the only clearing path)
//! GET  /cart/count              - Badge count
//! GET  /cart/events             - Badge count feed (SSE)
//!
//! # Checkout
//! GET  /checkout                - Order summary
//! POST /checkout                - Assemble and submit the order
//!
//! # Payment
//! POST /payment/start           - Initiate payment for the current order
//! GET  /payment/status          - One status check (?transaction_id=)
//! GET  /payment/wait/{tx}       - Bounded wait for a terminal status
//!
//! # Auth & locale
//! POST /auth/login              - Log in (phone + password)
//! POST /auth/register           - Register an account
//! POST /auth/logout             - Log out (cart survives)
//! POST /lang                    - Set locale preference (en/fr)
//!
//! # Account (requires auth)
//! GET  /account/orders          - Order history
//!
//! # Vendor (requires vendor role)
//! GET  /vendor/products         - The vendor's own products
//! POST /vendor/products         - Create a product (multipart, screened)
//! GET  /vendor/orders           - The vendor's orders
//! ```

pub mod account;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod payment;
pub mod products;
pub mod vendor;

use axum::{
    Router,
    routing::{get, post},
};
use rust_decimal::Decimal;

use mboa_market_core::Price;

use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
        .route("/events", get(cart::events))
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new().route("/", get(checkout::show).post(checkout::submit))
}

/// Create the payment routes router.
pub fn payment_routes() -> Router<AppState> {
    Router::new()
        .route("/start", post(payment::start))
        .route("/status", get(payment::status))
        .route("/wait/{transaction_id}", get(payment::wait))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/register", post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new().route("/orders", get(account::orders))
}

/// Create the vendor routes router.
pub fn vendor_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(vendor::products).post(vendor::create_product))
        .route("/orders", get(vendor::orders))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home view
        .route("/", get(home::home))
        // Product routes
        .nest("/products", product_routes())
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .nest("/checkout", checkout_routes())
        // Payment
        .nest("/payment", payment_routes())
        // Auth routes
        .nest("/auth", auth_routes())
        // Locale preference
        .route("/lang", post(auth::set_lang))
        // Account routes
        .nest("/account", account_routes())
        // Vendor routes
        .nest("/vendor", vendor_routes())
}

/// Format an amount as the market's price label, e.g. "15 000 FCFA".
pub(crate) fn format_price(amount: &Decimal) -> String {
    Price::fcfa(*amount).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price_is_the_fcfa_label() {
        assert_eq!(format_price(&Decimal::from(15000)), "15 000 FCFA");
        assert_eq!(format_price(&Decimal::from(0)), "0 FCFA");
    }
}
