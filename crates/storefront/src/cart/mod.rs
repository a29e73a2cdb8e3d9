//! Shopping cart: persisted store, mutators, and the cross-view
//! synchronizer.
//!
//! # Architecture
//!
//! The cart is a list of [`CartLine`] snapshots serialized as one value
//! under the `cartItems` storage key - the single source of truth across
//! every view of the same browser session. Three layers:
//!
//! - [`ops`] - pure mutators: each computes a new line list from an action
//! - [`CartStore`] - applies a mutator and rewrites the full persisted
//!   snapshot on every call (no batching, no partial writes)
//! - [`CartEvents`] - publish/subscribe badge synchronizer: every persisted
//!   mutation publishes the new badge count to the session's watch channel,
//!   so concurrently mounted views converge without polling
//!
//! Concurrent writers (two tabs sharing one session) are last-write-wins:
//! there is no merge, no versioning, and no conflict detection.

pub(crate) mod line;
pub mod ops;
mod store;
mod sync;

pub use line::CartLine;
pub use store::{CartLoadError, CartStore};
pub use sync::CartEvents;
