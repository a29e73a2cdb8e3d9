//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::api::{ApiError, MarketClient};
use crate::cart::CartEvents;
use crate::config::StorefrontConfig;
use crate::services::{ModerationClient, ModerationError};

/// Error building the application state.
#[derive(Debug, thiserror::Error)]
pub enum StateInitError {
    #[error("market client: {0}")]
    Market(#[from] ApiError),
    #[error("moderation client: {0}")]
    Moderation(#[from] ModerationError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the market API client and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    market: MarketClient,
    moderation: Option<ModerationClient>,
    cart_events: CartEvents,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if one of the HTTP clients fails to build.
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Result<Self, StateInitError> {
        let market = MarketClient::new(&config.market)?;
        let moderation = config
            .moderation
            .as_ref()
            .map(ModerationClient::new)
            .transpose()?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                market,
                moderation,
                cart_events: CartEvents::new(),
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the market API client.
    #[must_use]
    pub fn market(&self) -> &MarketClient {
        &self.inner.market
    }

    /// Get the moderation client, if screening is configured.
    #[must_use]
    pub fn moderation(&self) -> Option<&ModerationClient> {
        self.inner.moderation.as_ref()
    }

    /// Get a reference to the cart event bus.
    #[must_use]
    pub fn cart_events(&self) -> &CartEvents {
        &self.inner.cart_events
    }
}
