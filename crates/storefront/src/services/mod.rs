//! External service clients (beyond the market API itself).

pub mod moderation;

pub use moderation::{ModerationClient, ModerationError, ModerationVerdict};
