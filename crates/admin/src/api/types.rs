//! Wire types for the market API's admin surface.
//!
//! Unlike the public endpoints, the admin aggregation endpoints answer
//! with bare JSON bodies (no `{success, message, data}` envelope); only
//! the shared user endpoints keep the envelope.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mboa_market_core::{OrderId, OrderStatus, ProductId, UserId, UserRole};

/// Standard `{success, message, data}` envelope (user endpoints only).
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: Option<T>,
}

/// Marketplace-wide dashboard counters.
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardMetrics {
    pub total_users: i64,
    pub total_vendors: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub total_revenue: Decimal,
}

/// Monthly sales figure.
#[derive(Debug, Clone, Deserialize)]
pub struct SalesTrend {
    pub month: String,
    pub sales: Decimal,
}

/// Monthly registered-buyers vs buyers-with-orders figures.
#[derive(Debug, Clone, Deserialize)]
pub struct BuyerConversion {
    pub month: String,
    pub registered_buyers: u64,
    pub buyers_with_orders: u64,
    pub conversion_rate: f64,
}

/// Category share of the catalog or of sales.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryStat {
    pub category: String,
    pub percentage: f64,
    pub value: u64,
}

/// A recent marketplace activity entry.
#[derive(Debug, Clone, Deserialize)]
pub struct Activity {
    pub activity_type: String,
    pub name: String,
    pub time: String,
    pub action: String,
}

/// An order as the admin surface reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminOrder {
    pub id: OrderId,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_phone: String,
    #[serde(default)]
    pub status: OrderStatus,
    pub total: Decimal,
    pub created_at: DateTime<Utc>,
}

/// A product awaiting moderation.
#[derive(Debug, Clone, Deserialize)]
pub struct PendingProduct {
    pub id: ProductId,
    pub seller_id: UserId,
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_urls: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// Login request body.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub phone: String,
    pub password: String,
    pub role: UserRole,
}

/// Authenticated user as returned by login.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub full_name: String,
    pub role: UserRole,
}

/// Login response: a bearer token plus the user record.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: AuthUser,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_metrics_deserialize() {
        let json = r#"{
            "total_users": 1250,
            "total_vendors": 87,
            "total_products": 430,
            "total_orders": 2210,
            "total_revenue": 18500000
        }"#;

        let metrics: DashboardMetrics = serde_json::from_str(json).unwrap();
        assert_eq!(metrics.total_vendors, 87);
        assert_eq!(metrics.total_revenue, Decimal::from(18_500_000));
    }

    #[test]
    fn test_buyer_conversion_deserialize() {
        let json = r#"{
            "month": "2025-04",
            "registered_buyers": 120,
            "buyers_with_orders": 45,
            "conversion_rate": 37.5
        }"#;

        let conversion: BuyerConversion = serde_json::from_str(json).unwrap();
        assert_eq!(conversion.buyers_with_orders, 45);
        assert!((conversion.conversion_rate - 37.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_pending_product_tolerates_missing_optionals() {
        let json = r#"{
            "id": "5f0c9b60-3d4b-4d2e-b2a4-111111111111",
            "seller_id": "5f0c9b60-3d4b-4d2e-b2a4-222222222222",
            "title": "Ndop Cloth",
            "price": 32000,
            "created_at": "2025-05-01T08:00:00Z"
        }"#;

        let product: PendingProduct = serde_json::from_str(json).unwrap();
        assert!(product.category.is_none());
        assert!(product.image_urls.is_empty());
    }
}
