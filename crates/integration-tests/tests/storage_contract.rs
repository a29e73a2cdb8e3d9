//! The persisted per-browser storage format.
//!
//! A deployed session written by one release must load under the next, so
//! the key names and value shapes are a contract: `cartItems`, `token`,
//! `userId`, `userRole`, `userName`, `currentOrder`, `lang`.

use mboa_market_integration_tests::{fixture_product, memory_session};
use mboa_market_storefront::cart::{CartEvents, CartStore};
use mboa_market_storefront::middleware::auth::set_identity;
use mboa_market_storefront::models::{Identity, storage_keys};

use mboa_market_core::{UserId, UserRole};
use serde_json::Value;
use uuid::Uuid;

#[test]
fn key_names_are_the_documented_ones() {
    assert_eq!(storage_keys::CART_ITEMS, "cartItems");
    assert_eq!(storage_keys::TOKEN, "token");
    assert_eq!(storage_keys::USER_ID, "userId");
    assert_eq!(storage_keys::USER_ROLE, "userRole");
    assert_eq!(storage_keys::USER_NAME, "userName");
    assert_eq!(storage_keys::CURRENT_ORDER, "currentOrder");
    assert_eq!(storage_keys::LANG, "lang");
}

#[tokio::test]
async fn cart_lines_persist_with_the_original_field_names() {
    let session = memory_session();
    let store = CartStore::new(session.clone(), CartEvents::new());

    let basket = fixture_product("Bamboo Basket", 15000);
    store.add_item(&basket, 2).await.expect("add");

    let raw: Value = session
        .get(storage_keys::CART_ITEMS)
        .await
        .expect("read")
        .expect("present");

    let line = raw
        .as_array()
        .expect("cart is a JSON array")
        .first()
        .expect("one line");

    for key in ["id", "name", "price", "quantity", "category", "image", "returnPolicy"] {
        assert!(line.get(key).is_some(), "missing persisted field {key}");
    }
    assert_eq!(line["quantity"], 2);
    assert_eq!(line["name"], "Bamboo Basket");
}

#[tokio::test]
async fn resaving_a_loaded_cart_changes_nothing() {
    let session = memory_session();
    let store = CartStore::new(session.clone(), CartEvents::new());

    store
        .add_item(&fixture_product("Basket", 15000), 1)
        .await
        .expect("add");
    store
        .add_item(&fixture_product("Coffee", 8500), 3)
        .await
        .expect("add");

    let before: Value = session
        .get(storage_keys::CART_ITEMS)
        .await
        .expect("read")
        .expect("present");

    let loaded = store.load().await.expect("load");
    store.save(&loaded).await.expect("save");

    let after: Value = session
        .get(storage_keys::CART_ITEMS)
        .await
        .expect("read")
        .expect("present");

    assert_eq!(before, after);
}

#[tokio::test]
async fn identity_lives_under_four_separate_keys() {
    let session = memory_session();
    let identity = Identity {
        user_id: UserId::new(Uuid::new_v4()),
        name: "Ngono Marie".to_string(),
        role: UserRole::Vendor,
        token: "bearer-token".to_string(),
    };
    set_identity(&session, &identity).await.expect("set");

    let token: Option<String> = session.get(storage_keys::TOKEN).await.expect("read");
    assert_eq!(token.as_deref(), Some("bearer-token"));

    let role: Option<Value> = session.get(storage_keys::USER_ROLE).await.expect("read");
    assert_eq!(role, Some(Value::String("Vendor".to_string())));

    let name: Option<String> = session.get(storage_keys::USER_NAME).await.expect("read");
    assert_eq!(name.as_deref(), Some("Ngono Marie"));
}

#[tokio::test]
async fn admin_identity_serializes_stably() {
    let admin = mboa_market_admin::models::CurrentAdmin {
        user_id: UserId::new(Uuid::new_v4()),
        name: "Admin".to_string(),
        token: "admin-token".to_string(),
    };

    let value = serde_json::to_value(&admin).expect("serialize");
    assert!(value.get("user_id").is_some());
    assert!(value.get("name").is_some());
    assert!(value.get("token").is_some());

    let back: mboa_market_admin::models::CurrentAdmin =
        serde_json::from_value(value).expect("deserialize");
    assert_eq!(back.name, "Admin");
}
