//! Home view handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::api::types::ProductFilter;
use crate::error::Result;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// How many products the home view features.
const FEATURED_COUNT: usize = 8;

/// Home view data: a featured slice of the catalog plus the set of
/// categories to browse.
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub featured: Vec<ProductView>,
    pub categories: Vec<String>,
}

/// Home view.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> Result<Json<HomeView>> {
    let products = state.market().list_products(&ProductFilter::default()).await?;

    let mut categories: Vec<String> = products
        .iter()
        .filter_map(|p| p.category.clone())
        .collect();
    categories.sort();
    categories.dedup();

    let featured = products
        .iter()
        .take(FEATURED_COUNT)
        .map(ProductView::from)
        .collect();

    Ok(Json(HomeView {
        featured,
        categories,
    }))
}
