//! Wire types for the market REST API.
//!
//! Shapes mirror what the market backend actually sends; fields the
//! storefront does not consume are omitted and tolerated via
//! `#[serde(default)]` where the backend is known to elide them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mboa_market_core::{OrderId, OrderStatus, PaymentId, PaymentStatus, ProductId, TransactionRef, UserId, UserRole};

/// Standard `{success, message, data}` response envelope.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// A catalog product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub seller_id: UserId,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    #[serde(rename = "returnPolicy", default)]
    pub return_policy: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for creating a product.
#[derive(Debug, Clone, Serialize)]
pub struct NewProduct {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub image_urls: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<u32>,
    #[serde(rename = "returnPolicy", skip_serializing_if = "Option::is_none")]
    pub return_policy: Option<String>,
}

/// Catalog listing filters, passed through as query parameters.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProductFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seller_id: Option<UserId>,
}

impl ProductFilter {
    /// Whether the filter selects the whole catalog.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.category.is_none() && self.seller_id.is_none()
    }
}

/// Payment method selected at checkout.
///
/// Wire values are the checkout form's option names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    #[serde(rename = "mobileMoney")]
    MobileMoney,
    #[serde(rename = "card")]
    Card,
    #[serde(rename = "cash")]
    Cash,
}

/// One order line in a creation request: the cart line reduced to what the
/// backend prices an order from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItemInput {
    pub product_id: ProductId,
    pub quantity: u32,
    pub price: Decimal,
}

/// Order creation request body.
#[derive(Debug, Clone, Serialize)]
pub struct CreateOrderRequest {
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub city: String,
    pub region: String,
    #[serde(rename = "paymentMethod")]
    pub payment_method: PaymentMethod,
    pub items: Vec<OrderItemInput>,
    pub total: Decimal,
}

/// An order as returned by the market API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub id: OrderId,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub delivery_address: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

/// Payment initiation request body.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentRequest {
    pub order_id: OrderId,
    pub name: String,
    pub phone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_url: Option<String>,
}

/// Payment record returned by initiation and verification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: Decimal,
    pub status: PaymentStatus,
    pub transaction_id: TransactionRef,
    #[serde(default)]
    pub payment_link: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Registration request body.
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub phone: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
}

/// Authenticated user as returned by login/registration.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub full_name: String,
    pub role: UserRole,
}

/// Login/registration response: a bearer token plus the user record.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}
