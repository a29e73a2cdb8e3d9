//! Cross-view cart synchronizer.
//!
//! Replaces fixed-interval polling with an explicit publish/subscribe bus:
//! every persisted cart mutation publishes the new badge count on the
//! session's watch channel, and anything rendering the badge subscribes.
//! Views in the same tab and in sibling tabs share one session, so both
//! converge from the same channel.
//!
//! Channels exist only while something is watching: `subscribe` creates
//! them, `publish` updates existing ones and drops channels whose last
//! watcher disconnected. A late subscriber primes itself from the store,
//! so nothing is lost when a mutation happens with no watchers.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tokio::sync::watch;
use uuid::Uuid;

/// Publish/subscribe bus for cart badge counts, keyed by the session's
/// cart channel id.
///
/// Cheaply cloneable; one instance lives in the application state.
#[derive(Clone, Default)]
pub struct CartEvents {
    inner: Arc<Mutex<HashMap<Uuid, watch::Sender<u32>>>>,
}

impl CartEvents {
    /// Create an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe to badge-count updates for a session's channel.
    ///
    /// The receiver's current value is whatever was last published (or
    /// `initial` for a fresh channel); every later publish wakes it.
    #[must_use]
    pub fn subscribe(&self, channel: Uuid, initial: u32) -> watch::Receiver<u32> {
        let mut channels = self.lock();
        channels
            .entry(channel)
            .or_insert_with(|| watch::channel(initial).0)
            .subscribe()
    }

    /// Publish a new badge count to a session's channel.
    ///
    /// A no-op when nothing is watching; also reaps channels whose
    /// watchers have all disconnected.
    pub fn publish(&self, channel: Uuid, count: u32) {
        let mut channels = self.lock();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        if let Some(sender) = channels.get(&channel) {
            sender.send_replace(count);
        }
    }

    /// Number of live channels (watched sessions).
    #[must_use]
    pub fn watched_sessions(&self) -> usize {
        let mut channels = self.lock();
        channels.retain(|_, sender| sender.receiver_count() > 0);
        channels.len()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<Uuid, watch::Sender<u32>>> {
        // A poisoned lock only means a panic elsewhere mid-update; the map
        // itself stays usable
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_sees_published_counts() {
        let events = CartEvents::new();
        let channel = Uuid::new_v4();

        let mut rx = events.subscribe(channel, 0);
        assert_eq!(*rx.borrow(), 0);

        events.publish(channel, 3);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 3);

        events.publish(channel, 2);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 2);
    }

    #[tokio::test]
    async fn test_publish_without_watchers_is_noop() {
        let events = CartEvents::new();
        events.publish(Uuid::new_v4(), 5);
        assert_eq!(events.watched_sessions(), 0);
    }

    #[tokio::test]
    async fn test_channels_are_per_session() {
        let events = CartEvents::new();
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();

        let rx_a = events.subscribe(a, 0);
        let rx_b = events.subscribe(b, 0);

        events.publish(a, 7);

        assert_eq!(*rx_a.borrow(), 7);
        assert_eq!(*rx_b.borrow(), 0);
    }

    #[tokio::test]
    async fn test_disconnected_channels_are_reaped() {
        let events = CartEvents::new();
        let channel = Uuid::new_v4();

        let rx = events.subscribe(channel, 0);
        assert_eq!(events.watched_sessions(), 1);

        drop(rx);
        events.publish(channel, 1);
        assert_eq!(events.watched_sessions(), 0);
    }

    #[tokio::test]
    async fn test_two_watchers_one_channel() {
        // Two tabs of the same browser session share a channel
        let events = CartEvents::new();
        let channel = Uuid::new_v4();

        let rx_nav = events.subscribe(channel, 0);
        let rx_page = events.subscribe(channel, 0);

        events.publish(channel, 4);

        assert_eq!(*rx_nav.borrow(), 4);
        assert_eq!(*rx_page.borrow(), 4);
    }
}
