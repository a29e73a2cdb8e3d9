//! Persisted cart store.
//!
//! The single source of truth for cart contents: the full line list lives
//! as one serialized value under the `cartItems` session key. Every
//! mutator loads, applies a pure op from [`super::ops`], and rewrites the
//! whole snapshot - there are no partial writes, and rapid successive
//! calls each produce their own store write.

use thiserror::Error;
use tower_sessions::Session;
use uuid::Uuid;

use mboa_market_core::ProductId;

use crate::api::types::Product;
use crate::models::storage_keys;

use super::{CartEvents, CartLine, ops};

/// Error loading the persisted cart.
#[derive(Debug, Error)]
pub enum CartLoadError {
    /// The stored value did not deserialize as a cart line list.
    #[error("stored cart is corrupt: {0}")]
    Corrupt(String),
}

/// Handle to a session's persisted cart.
///
/// Constructed per request from the request's session and the shared
/// [`CartEvents`] bus. Mutations persist immediately and publish the new
/// badge count.
pub struct CartStore {
    session: Session,
    events: CartEvents,
}

impl CartStore {
    /// Create a store handle for a request's session.
    #[must_use]
    pub const fn new(session: Session, events: CartEvents) -> Self {
        Self { session, events }
    }

    /// Load the persisted cart.
    ///
    /// Returns `Ok(empty)` when nothing has been persisted yet.
    ///
    /// # Errors
    ///
    /// Returns [`CartLoadError::Corrupt`] when a value exists but does not
    /// deserialize - the caller decides whether to log, reset, or surface
    /// it.
    pub async fn load(&self) -> Result<Vec<CartLine>, CartLoadError> {
        match self.session.get::<Vec<CartLine>>(storage_keys::CART_ITEMS).await {
            Ok(Some(items)) => Ok(items),
            Ok(None) => Ok(Vec::new()),
            Err(e) => Err(CartLoadError::Corrupt(e.to_string())),
        }
    }

    /// Load the persisted cart, recovering from corruption.
    ///
    /// A corrupt value is logged and treated as an empty cart; the shopper
    /// never sees an error for it.
    pub async fn load_or_empty(&self) -> Vec<CartLine> {
        match self.load().await {
            Ok(items) => items,
            Err(e) => {
                tracing::warn!("Discarding unreadable cart: {e}");
                Vec::new()
            }
        }
    }

    /// Persist the full cart snapshot, overwriting the previous value, and
    /// publish the new badge count.
    ///
    /// Last-write-wins: concurrent writers of the same session are not
    /// merged.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the write.
    pub async fn save(&self, items: &[CartLine]) -> Result<(), tower_sessions::session::Error> {
        self.session.insert(storage_keys::CART_ITEMS, items).await?;
        let channel = self.channel().await?;
        self.events.publish(channel, ops::badge_count(items));
        Ok(())
    }

    /// Add a product to the cart (quantity defaults to 1 at the call
    /// sites). Persists on every call.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted write fails.
    pub async fn add_item(
        &self,
        product: &Product,
        quantity: u32,
    ) -> Result<Vec<CartLine>, tower_sessions::session::Error> {
        let items = ops::add_item(self.load_or_empty().await, product, quantity);
        self.save(&items).await?;
        Ok(items)
    }

    /// Set a line's quantity; 0 removes the line, an absent id is a no-op
    /// (but the snapshot is still persisted).
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted write fails.
    pub async fn update_quantity(
        &self,
        product_id: ProductId,
        quantity: u32,
    ) -> Result<Vec<CartLine>, tower_sessions::session::Error> {
        let items = ops::update_quantity(self.load_or_empty().await, product_id, quantity);
        self.save(&items).await?;
        Ok(items)
    }

    /// Remove a line from the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted write fails.
    pub async fn remove_item(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<CartLine>, tower_sessions::session::Error> {
        let items = ops::remove_item(self.load_or_empty().await, product_id);
        self.save(&items).await?;
        Ok(items)
    }

    /// Replace the cart with the empty list. The only clearing path in the
    /// system - successful checkout does not clear the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted write fails.
    pub async fn clear(&self) -> Result<(), tower_sessions::session::Error> {
        self.save(&[]).await
    }

    /// Current badge count (sum of quantities).
    pub async fn count(&self) -> u32 {
        ops::badge_count(&self.load_or_empty().await)
    }

    /// The session's cart event-channel id, minted on first use.
    ///
    /// Stored in the session so every view of the same browser session
    /// publishes and subscribes on the same channel.
    ///
    /// # Errors
    ///
    /// Returns an error if the session store rejects the read or write.
    pub async fn channel(&self) -> Result<Uuid, tower_sessions::session::Error> {
        if let Some(channel) = self
            .session
            .get::<Uuid>(storage_keys::CART_CHANNEL)
            .await
            .unwrap_or_default()
        {
            return Ok(channel);
        }
        let channel = Uuid::new_v4();
        self.session.insert(storage_keys::CART_CHANNEL, channel).await?;
        Ok(channel)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::line::tests::product;
    use std::sync::Arc;
    use tower_sessions::{MemoryStore, Session};

    fn memory_session() -> Session {
        Session::new(None, Arc::new(MemoryStore::default()), None)
    }

    fn store() -> CartStore {
        CartStore::new(memory_session(), CartEvents::new())
    }

    #[tokio::test]
    async fn test_load_empty_when_nothing_persisted() {
        assert!(store().load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_mutators_persist_each_call() {
        let store = store();
        let p = product(Uuid::new_v4(), "Basket", 15000);

        store.add_item(&p, 1).await.unwrap();
        store.add_item(&p, 1).await.unwrap();

        let items = store.load().await.unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 2);
        assert_eq!(store.count().await, 2);
    }

    #[tokio::test]
    async fn test_update_quantity_zero_removes() {
        let store = store();
        let p = product(Uuid::new_v4(), "Basket", 15000);

        store.add_item(&p, 2).await.unwrap();
        store.update_quantity(p.id, 0).await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_clear_persists_empty_list() {
        let store = store();
        let p = product(Uuid::new_v4(), "Basket", 15000);

        store.add_item(&p, 3).await.unwrap();
        store.clear().await.unwrap();

        assert!(store.load().await.unwrap().is_empty());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn test_corrupt_value_is_tagged_then_recovered() {
        let session = memory_session();
        session
            .insert(storage_keys::CART_ITEMS, "definitely not a cart")
            .await
            .unwrap();

        let store = CartStore::new(session, CartEvents::new());

        // Tagged result for callers that care
        assert!(matches!(store.load().await, Err(CartLoadError::Corrupt(_))));

        // Silent recovery for the shopper-facing path
        assert!(store.load_or_empty().await.is_empty());
    }

    #[tokio::test]
    async fn test_save_load_roundtrip_is_idempotent() {
        let store = store();
        let p = product(Uuid::new_v4(), "Basket", 15000);
        store.add_item(&p, 2).await.unwrap();

        let first: serde_json::Value = store
            .session
            .get(storage_keys::CART_ITEMS)
            .await
            .unwrap()
            .unwrap();

        let loaded = store.load().await.unwrap();
        store.save(&loaded).await.unwrap();

        let second: serde_json::Value = store
            .session
            .get(storage_keys::CART_ITEMS)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_concurrent_writers_last_write_wins() {
        // Two tabs sharing one session each hold an in-memory copy;
        // whichever saves last overwrites the other's add
        let store = store();
        let first = product(Uuid::new_v4(), "Basket", 15000);
        let second = product(Uuid::new_v4(), "Coffee", 8500);

        let tab_a = store.load_or_empty().await;
        let tab_b = store.load_or_empty().await;

        store.save(&ops::add_item(tab_a, &first, 1)).await.unwrap();
        store.save(&ops::add_item(tab_b, &second, 1)).await.unwrap();

        let final_cart = store.load().await.unwrap();
        assert_eq!(final_cart.len(), 1);
        assert_eq!(final_cart.first().unwrap().product_id, second.id);
    }

    #[tokio::test]
    async fn test_mutations_publish_badge_counts() {
        let session = memory_session();
        let events = CartEvents::new();
        let store = CartStore::new(session, events.clone());

        let channel = store.channel().await.unwrap();
        let mut rx = events.subscribe(channel, 0);

        let p = product(Uuid::new_v4(), "Basket", 15000);
        store.add_item(&p, 3).await.unwrap();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 3);

        store.clear().await.unwrap();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 0);
    }

    #[tokio::test]
    async fn test_channel_is_stable_per_session() {
        let store = store();
        let a = store.channel().await.unwrap();
        let b = store.channel().await.unwrap();
        assert_eq!(a, b);
    }
}
