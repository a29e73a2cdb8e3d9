//! Market REST API client.
//!
//! # Architecture
//!
//! - The market backend is the source of truth - NO local sync, direct API
//!   calls with the `{success, message, data}` envelope
//! - In-memory caching via `moka` for catalog reads (5 minute TTL)
//! - Bearer tokens come from the caller's session; the client itself is
//!   stateless with respect to users
//!
//! # Example
//!
//! ```rust,ignore
//! use mboa_market_storefront::api::MarketClient;
//!
//! let client = MarketClient::new(&config.market)?;
//!
//! // Browse the catalog
//! let products = client.list_products(&ProductFilter::default()).await?;
//!
//! // Place an order
//! let order = client.create_order(&token, &draft.into_request()).await?;
//! ```

pub mod types;

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use thiserror::Error;
use tracing::{debug, instrument};

use mboa_market_core::{ProductId, TransactionRef};

use crate::config::MarketApiConfig;
use types::{
    AuthResponse, CreateOrderRequest, Envelope, LoginRequest, NewProduct, OrderResponse,
    PaymentRequest, PaymentResponse, Product, ProductFilter, RegisterRequest,
};

/// Catalog cache TTL.
const CACHE_TTL: Duration = Duration::from_secs(300); // 5 minutes

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

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Failed to parse a response body.
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Cached catalog values.
#[derive(Clone)]
enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
}

/// Client for the market REST API.
///
/// Cheaply cloneable; catalog reads are cached for 5 minutes, mutable
/// state (orders, payments, uploads) is never cached.
#[derive(Clone)]
pub struct MarketClient {
    inner: Arc<MarketClientInner>,
}

struct MarketClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl MarketClient {
    /// Create a new market API client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: &MarketApiConfig) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        Ok(Self {
            inner: Arc::new(MarketClientInner {
                client,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.inner.base_url)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// List catalog products, optionally filtered by category or seller.
    ///
    /// Unfiltered listings are cached; filtered queries always hit the API.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, ApiError> {
        let cache_key = "products:all".to_string();

        if filter.is_empty()
            && let Some(CacheValue::Products(products)) = self.inner.cache.get(&cache_key).await
        {
            debug!("Cache hit for product listing");
            return Ok(products);
        }

        let response = self
            .inner
            .client
            .get(self.url("/api/products"))
            .query(filter)
            .send()
            .await?;

        let products: Vec<Product> = parse_envelope(response, "product listing").await?;

        if filter.is_empty() {
            self.inner
                .cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Get a single product by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: ProductId) -> Result<Product, ApiError> {
        let cache_key = format!("product:{id}");

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let response = self
            .inner
            .client
            .get(self.url(&format!("/api/products/{id}")))
            .send()
            .await?;

        let product: Product = parse_envelope(response, "product").await?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Create a product (vendor only).
    ///
    /// Invalidates the cached catalog listing on success.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the payload.
    #[instrument(skip(self, token, product), fields(title = %product.title))]
    pub async fn create_product(
        &self,
        token: &str,
        product: &NewProduct,
    ) -> Result<Product, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/products"))
            .bearer_auth(token)
            .json(product)
            .send()
            .await?;

        let created: Product = parse_envelope(response, "product creation").await?;

        self.inner.cache.invalidate(&"products:all".to_string()).await;

        Ok(created)
    }

    /// Upload a product image; returns the storage object key as plain text.
    ///
    /// # Errors
    ///
    /// Returns an error if the upload fails.
    #[instrument(skip(self, token, bytes), fields(file_name = %file_name, size = bytes.len()))]
    pub async fn upload_image(
        &self,
        token: &str,
        file_name: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> Result<String, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::Parse(format!("invalid content type: {e}")))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .inner
            .client
            .post(self.url("/products/upload-image"))
            .bearer_auth(token)
            .multipart(form)
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

        // The upload endpoint answers with the bare object key, not JSON
        Ok(body.trim().to_string())
    }

    // =========================================================================
    // Order Methods (not cached - mutable state)
    // =========================================================================

    /// Create an order from an assembled checkout draft.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the order.
    #[instrument(skip(self, token, request), fields(total = %request.total, lines = request.items.len()))]
    pub async fn create_order(
        &self,
        token: &str,
        request: &CreateOrderRequest,
    ) -> Result<OrderResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/orders"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await?;

        parse_envelope(response, "order creation").await
    }

    /// List the caller's orders (buyers see their purchases, vendors their
    /// sales - the API scopes by token).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self, token))]
    pub async fn list_orders(&self, token: &str) -> Result<Vec<OrderResponse>, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url("/api/orders"))
            .bearer_auth(token)
            .send()
            .await?;

        parse_envelope(response, "order listing").await
    }

    // =========================================================================
    // Payment Methods
    // =========================================================================

    /// Initiate an indirect (gateway-hosted) payment for an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the gateway rejects it.
    #[instrument(skip(self, request), fields(order_id = %request.order_id))]
    pub async fn create_indirect_payment(
        &self,
        request: &PaymentRequest,
    ) -> Result<PaymentResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/indirect_payment"))
            .json(request)
            .send()
            .await?;

        parse_envelope(response, "payment initiation").await
    }

    /// Check the status of a payment transaction.
    ///
    /// A single request whose result directly drives the payment state; the
    /// client never retries on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    #[instrument(skip(self), fields(transaction_id = %transaction_id))]
    pub async fn verify_payment(
        &self,
        transaction_id: &TransactionRef,
    ) -> Result<PaymentResponse, ApiError> {
        let response = self
            .inner
            .client
            .get(self.url(&format!("/api/verify_payment/{transaction_id}")))
            .send()
            .await?;

        parse_envelope(response, "payment verification").await
    }

    // =========================================================================
    // User Methods
    // =========================================================================

    /// Log in with phone and password.
    ///
    /// # Errors
    ///
    /// Returns an error if the credentials are rejected or the request fails.
    #[instrument(skip(self, request), fields(role = ?request.role))]
    pub async fn login(&self, request: &LoginRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/users/login"))
            .json(request)
            .send()
            .await?;

        parse_envelope(response, "login").await
    }

    /// Register a new account.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the payload.
    #[instrument(skip(self, request), fields(role = ?request.role))]
    pub async fn register(&self, request: &RegisterRequest) -> Result<AuthResponse, ApiError> {
        let response = self
            .inner
            .client
            .post(self.url("/api/users"))
            .json(request)
            .send()
            .await?;

        parse_envelope(response, "registration").await
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Invalidate all cached catalog data.
    pub async fn invalidate_all(&self) {
        self.inner.cache.invalidate_all();
        self.inner.cache.run_pending_tasks().await;
    }
}

/// Parse an enveloped response body.
///
/// Reads the body as text first for better error diagnostics, then unwraps
/// the `{success, message, data}` envelope.
async fn parse_envelope<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    what: &str,
) -> Result<T, ApiError> {
    let status = response.status();

    if status == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(what.to_string()));
    }

    let body = response.text().await?;

    if !status.is_success() {
        // Prefer the envelope's message when the error body still carries one
        let message = serde_json::from_str::<Envelope<serde_json::Value>>(&body)
            .map_or_else(|_| truncate(&body), |envelope| envelope.message);
        tracing::error!(
            status = %status,
            body = %truncate(&body),
            "Market API returned non-success status for {what}"
        );
        return Err(ApiError::Api {
            status: status.as_u16(),
            message,
        });
    }

    let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
        tracing::error!(
            error = %e,
            body = %truncate(&body),
            "Failed to parse market API response for {what}"
        );
        ApiError::Parse(e.to_string())
    })?;

    if !envelope.success {
        return Err(ApiError::Rejected(envelope.message));
    }

    envelope
        .data
        .ok_or_else(|| ApiError::Parse(format!("missing data in {what} response")))
}

/// Truncate a response body for log output.
fn truncate(body: &str) -> String {
    body.chars().take(200).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::NotFound("product".to_string());
        assert_eq!(err.to_string(), "Not found: product");

        let err = ApiError::Rejected("Out of stock".to_string());
        assert_eq!(err.to_string(), "Request rejected: Out of stock");

        let err = ApiError::Api {
            status: 502,
            message: "upstream down".to_string(),
        };
        assert_eq!(err.to_string(), "API error: 502 - upstream down");
    }

    #[test]
    fn test_truncate_caps_long_bodies() {
        let long = "x".repeat(500);
        assert_eq!(truncate(&long).len(), 200);
        assert_eq!(truncate("short"), "short");
    }

    #[test]
    fn test_client_trims_trailing_slash() {
        let config = MarketApiConfig {
            base_url: "http://localhost:8080/".to_string(),
            timeout_secs: 30,
        };
        let client = MarketClient::new(&config).unwrap();
        assert_eq!(client.url("/api/products"), "http://localhost:8080/api/products");
    }
}
