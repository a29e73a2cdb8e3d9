//! Database pool setup.
//!
//! The storefront keeps no domain tables of its own - products, orders,
//! payments, and users all live behind the market API. The only local
//! schema is the session table, owned and migrated by the session store.

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Create the `PostgreSQL` connection pool for the session store.
///
/// # Errors
///
/// Returns an error if the database is unreachable.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url.expose_secret())
        .await
}
