//! Dashboard route handler.
//!
//! One view assembles everything the dashboard shows: the counter tiles,
//! the sales trend, buyer conversion, category shares, and the recent
//! activity feed. The five aggregation calls run concurrently.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use mboa_market_core::Price;

use crate::api::types::{Activity, BuyerConversion, CategoryStat, DashboardMetrics, SalesTrend};
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Counter tiles at the top of the dashboard.
#[derive(Debug, Serialize)]
pub struct MetricsView {
    pub total_users: i64,
    pub total_vendors: i64,
    pub total_products: i64,
    pub total_orders: i64,
    pub total_revenue: String,
}

impl From<&DashboardMetrics> for MetricsView {
    fn from(metrics: &DashboardMetrics) -> Self {
        Self {
            total_users: metrics.total_users,
            total_vendors: metrics.total_vendors,
            total_products: metrics.total_products,
            total_orders: metrics.total_orders,
            total_revenue: Price::fcfa(metrics.total_revenue).to_string(),
        }
    }
}

/// Monthly sales point for the trend chart.
#[derive(Debug, Serialize)]
pub struct SalesTrendView {
    pub month: String,
    pub sales: Decimal,
}

/// The assembled dashboard.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub metrics: MetricsView,
    pub sales_trends: Vec<SalesTrendView>,
    pub buyer_conversion: Vec<BuyerConversionView>,
    pub top_categories: Vec<CategoryView>,
    pub recent_activities: Vec<ActivityView>,
}

/// Monthly conversion figures.
#[derive(Debug, Serialize)]
pub struct BuyerConversionView {
    pub month: String,
    pub registered_buyers: u64,
    pub buyers_with_orders: u64,
    pub conversion_rate: f64,
}

/// Category share slice.
#[derive(Debug, Serialize)]
pub struct CategoryView {
    pub category: String,
    pub percentage: f64,
    pub value: u64,
}

/// Activity feed entry.
#[derive(Debug, Serialize)]
pub struct ActivityView {
    pub activity_type: String,
    pub name: String,
    pub time: String,
    pub action: String,
}

/// Admin dashboard.
#[instrument(skip(state, admin))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
) -> Result<Json<DashboardView>> {
    let market = state.market();
    let token = admin.token.as_str();

    let (metrics, trends, conversion, categories, activities) = tokio::try_join!(
        market.dashboard_metrics(token),
        market.sales_trends(token),
        market.buyer_conversion(token),
        market.top_categories(token),
        market.recent_activities(token),
    )?;

    Ok(Json(DashboardView {
        metrics: MetricsView::from(&metrics),
        sales_trends: trends
            .into_iter()
            .map(|t: SalesTrend| SalesTrendView {
                month: t.month,
                sales: t.sales,
            })
            .collect(),
        buyer_conversion: conversion
            .into_iter()
            .map(|c: BuyerConversion| BuyerConversionView {
                month: c.month,
                registered_buyers: c.registered_buyers,
                buyers_with_orders: c.buyers_with_orders,
                conversion_rate: c.conversion_rate,
            })
            .collect(),
        top_categories: categories
            .into_iter()
            .map(|c: CategoryStat| CategoryView {
                category: c.category,
                percentage: c.percentage,
                value: c.value,
            })
            .collect(),
        recent_activities: activities
            .into_iter()
            .map(|a: Activity| ActivityView {
                activity_type: a.activity_type,
                name: a.name,
                time: a.time,
                action: a.action,
            })
            .collect(),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_view_formats_revenue() {
        let metrics = DashboardMetrics {
            total_users: 10,
            total_vendors: 2,
            total_products: 30,
            total_orders: 40,
            total_revenue: Decimal::from(125_000),
        };
        let view = MetricsView::from(&metrics);
        assert_eq!(view.total_revenue, "125 000 FCFA");
    }
}
