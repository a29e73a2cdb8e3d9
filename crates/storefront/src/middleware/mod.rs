//! HTTP middleware: sessions, authentication extractors, request IDs.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{OptionalUser, RequireUser, RequireVendor};
pub use request_id::request_id_middleware;
pub use session::create_session_layer;
