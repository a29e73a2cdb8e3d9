//! Market API client for the admin surface.
//!
//! Wraps the `/api/admin/*` aggregation endpoints and the moderation
//! actions. Nothing here is cached: the dashboard always shows live
//! numbers, and approve/reject must take effect immediately.

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::instrument;

use mboa_market_core::ProductId;

use crate::config::AdminConfig;
use types::{
    Activity, AdminOrder, AuthResponse, BuyerConversion, CategoryStat, DashboardMetrics,
    Envelope, LoginRequest, PendingProduct, SalesTrend,
};

/// Errors that can occur when talking to the market API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// API answered 2xx but the envelope carried `success: false`.
    #[error("Request rejected: {0}")]
    Rejected(String),

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Client for the market API's admin endpoints.
#[derive(Clone)]
pub struct AdminClient {
    inner: Arc<AdminClientInner>,
}

struct AdminClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl AdminClient {
    /// Create a new admin API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &AdminConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.market_api_timeout_secs))
            .build()?;

        Ok(Self {
            inner: Arc::new(AdminClientInner {
                client,
                base_url: config.market_api_url.trim_end_matches('/').to_string(),
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
    ) -> Result<T, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await?;

        parse_json(response).await
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Marketplace-wide counters.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn dashboard_metrics(&self, token: &str) -> Result<DashboardMetrics, ApiError> {
        self.get_json(token, "/api/admin/dashboard").await
    }

    /// Monthly sales figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn sales_trends(&self, token: &str) -> Result<Vec<SalesTrend>, ApiError> {
        self.get_json(token, "/api/admin/sales-trends").await
    }

    /// Monthly buyer conversion figures.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn buyer_conversion(&self, token: &str) -> Result<Vec<BuyerConversion>, ApiError> {
        self.get_json(token, "/api/admin/buyer-conversion").await
    }

    /// Category shares.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn top_categories(&self, token: &str) -> Result<Vec<CategoryStat>, ApiError> {
        self.get_json(token, "/api/admin/top-categories").await
    }

    /// Recent marketplace activities.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn recent_activities(&self, token: &str) -> Result<Vec<Activity>, ApiError> {
        self.get_json(token, "/api/admin/recent-activities").await
    }

    // =========================================================================
    // Orders & Moderation
    // =========================================================================

    /// All marketplace orders.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn orders(&self, token: &str) -> Result<Vec<AdminOrder>, ApiError> {
        self.get_json(token, "/api/admin/orders").await
    }

    /// Products awaiting moderation.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn pending_products(&self, token: &str) -> Result<Vec<PendingProduct>, ApiError> {
        self.get_json(token, "/api/admin/products/pending").await
    }

    /// Approve a pending product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn approve_product(
        &self,
        token: &str,
        id: ProductId,
    ) -> Result<PendingProduct, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url(&format!("/api/admin/products/{id}/approve")))
            .bearer_auth(token)
            .send()
            .await?;

        parse_json(response).await
    }

    /// Reject a pending product.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn reject_product(
        &self,
        token: &str,
        id: ProductId,
    ) -> Result<PendingProduct, ApiError> {
        let response = self
            .inner
            .client
            .put(self.url(&format!("/api/admin/products/{id}/reject")))
            .bearer_auth(token)
            .send()
            .await?;

        parse_json(response).await
    }

    // =========================================================================
    // Auth (shared user endpoints, enveloped)
    // =========================================================================

    /// Log in; the caller must still verify the admin role.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request
    /// fails.
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/users/login"))
            .json(request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(ApiError::Api {
                status: status.as_u16(),
                message: truncate(&body),
            });
        }

        let envelope: Envelope<AuthResponse> =
            serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))?;

        if !envelope.success {
            return Err(ApiError::Rejected(envelope.message));
        }

        envelope
            .data
            .ok_or_else(|| ApiError::Parse("missing data in login response".to_string()))
    }
}

/// Parse a bare (non-enveloped) JSON response body.
async fn parse_json<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, ApiError> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        tracing::error!(
            status = %status,
            body = %truncate(&body),
            "Admin API returned non-success status"
        );
        return Err(ApiError::Api {
            status: status.as_u16(),
            message: truncate(&body),
        });
    }

    serde_json::from_str(&body).map_err(|e| {
        tracing::error!(error = %e, body = %truncate(&body), "Failed to parse admin API response");
        ApiError::Parse(e.to_string())
    })
}

fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}
