//! Integration tests for Mboa Market.
//!
//! # Test Categories
//!
//! - `cart_checkout_flow` - Cart store, mutators, synchronizer, and
//!   checkout assembly against an in-memory session store
//! - `payment_phase` - Payment state machine transitions
//! - `storage_contract` - The persisted per-browser storage format
//!
//! Everything here runs against the in-memory session store; no network,
//! no database. Tests that need a live market API belong in a deployment
//! smoke suite, not here.

use std::sync::Arc;

use tower_sessions::{MemoryStore, Session};

/// A fresh session over an in-memory store - one "browser".
#[must_use]
pub fn memory_session() -> Session {
    Session::new(None, Arc::new(MemoryStore::default()), None)
}

/// A test fixture product.
#[must_use]
pub fn fixture_product(
    title: &str,
    price: i64,
) -> mboa_market_storefront::api::types::Product {
    use chrono::Utc;
    use mboa_market_core::{ProductId, UserId};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    mboa_market_storefront::api::types::Product {
        id: ProductId::new(Uuid::new_v4()),
        seller_id: UserId::new(Uuid::new_v4()),
        title: title.to_string(),
        description: None,
        price: Decimal::from(price),
        category: Some("Crafts".to_string()),
        image_urls: vec!["crafts/item.jpg".to_string()],
        return_policy: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
