//! Session-related types.

use serde::{Deserialize, Serialize};

use mboa_market_core::UserId;

/// Session-stored admin identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentAdmin {
    /// Admin's market API user ID.
    pub user_id: UserId,
    /// Display name.
    pub name: String,
    /// Bearer token for market API calls.
    pub token: String,
}

/// Persisted session keys.
pub mod storage_keys {
    /// Key for the logged-in admin identity.
    pub const CURRENT_ADMIN: &str = "currentAdmin";
}
