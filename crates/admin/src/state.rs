//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::api::{AdminClient, ApiError};
use crate::config::AdminConfig;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AdminConfig,
    pool: PgPool,
    market: AdminClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the market client fails to build.
    pub fn new(config: AdminConfig, pool: PgPool) -> Result<Self, ApiError> {
        let market = AdminClient::new(&config)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                market,
            }),
        })
    }

    /// Get a reference to the admin configuration.
    #[must_use]
    pub fn config(&self) -> &AdminConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the market API client.
    #[must_use]
    pub fn market(&self) -> &AdminClient {
        &self.inner.market
    }
}
