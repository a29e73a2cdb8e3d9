//! Session-related types.
//!
//! The session record is the per-browser persisted store: everything the
//! marketplace keeps between page loads (cart contents, bearer token, user
//! identity fields, the last created order, locale) lives under well-known
//! keys in one session.

use serde::{Deserialize, Serialize};

use mboa_market_core::{UserId, UserRole};

/// The logged-in user as assembled from the session.
///
/// The identity is not stored as one value: the market keeps the bearer
/// token and the user fields under separate keys (see [`storage_keys`]),
/// and the auth extractor assembles them. A session missing any of the
/// parts counts as logged out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    /// User's market API ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Role granted at login.
    pub role: UserRole,
    /// Bearer token for market API calls.
    pub token: String,
}

impl Identity {
    /// Whether this identity may manage products and vendor orders.
    #[must_use]
    pub fn is_vendor(&self) -> bool {
        self.role == UserRole::Vendor
    }
}

/// Persisted per-browser storage keys.
///
/// The key names are part of the storage format and must not change: a
/// deployed session written under these keys has to survive upgrades.
pub mod storage_keys {
    /// Key for the serialized cart line list.
    pub const CART_ITEMS: &str = "cartItems";

    /// Key for the cart event-channel id (used by the badge feed).
    pub const CART_CHANNEL: &str = "cartChannel";

    /// Key for the market API bearer token.
    pub const TOKEN: &str = "token";

    /// Key for the logged-in user's ID.
    pub const USER_ID: &str = "userId";

    /// Key for the logged-in user's role.
    pub const USER_ROLE: &str = "userRole";

    /// Key for the logged-in user's display name.
    pub const USER_NAME: &str = "userName";

    /// Key for the last created order snapshot (overwritten every checkout).
    pub const CURRENT_ORDER: &str = "currentOrder";

    /// Key for the locale preference (`en` or `fr`).
    pub const LANG: &str = "lang";
}
