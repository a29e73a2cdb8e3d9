//! Vendor route handlers.
//!
//! Product creation takes one multipart form: text fields plus the product
//! images. Every image runs through the moderation service before anything
//! is uploaded to storage - one flagged image blocks the whole submission
//! with the verdict's message, which names the detected object.

use axum::{
    Json,
    extract::{Multipart, State},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::instrument;

use mboa_market_core::{OrderId, OrderStatus};

use crate::api::types::{NewProduct, OrderResponse, ProductFilter};
use crate::error::{AppError, Result};
use crate::middleware::RequireVendor;
use crate::routes::format_price;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// An uploaded image, staged until screening passes.
struct StagedImage {
    file_name: String,
    content_type: String,
    bytes: Vec<u8>,
}

/// The multipart fields of the product form.
#[derive(Default)]
struct ProductFormFields {
    title: Option<String>,
    description: Option<String>,
    price: Option<Decimal>,
    category: Option<String>,
    quantity: Option<u32>,
    return_policy: Option<String>,
    images: Vec<StagedImage>,
}

/// Order display data for the vendor's order list.
#[derive(Debug, Serialize)]
pub struct OrderView {
    pub id: OrderId,
    pub customer_name: String,
    pub status: OrderStatus,
    pub total: String,
    pub line_count: usize,
    pub created_at: DateTime<Utc>,
}

impl From<&OrderResponse> for OrderView {
    fn from(order: &OrderResponse) -> Self {
        Self {
            id: order.id,
            customer_name: order.customer_name.clone(),
            status: order.status,
            total: format_price(&order.total),
            line_count: order.items.len(),
            created_at: order.created_at,
        }
    }
}

/// The vendor's own products.
#[instrument(skip(state, vendor))]
pub async fn products(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
) -> Result<Json<Vec<ProductView>>> {
    let filter = ProductFilter {
        category: None,
        seller_id: Some(vendor.user_id),
    };

    let products = state.market().list_products(&filter).await?;

    Ok(Json(products.iter().map(ProductView::from).collect()))
}

/// Create a product from the multipart form.
#[instrument(skip(state, vendor, multipart))]
pub async fn create_product(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
    multipart: Multipart,
) -> Result<Json<ProductView>> {
    let fields = read_product_form(multipart).await?;

    let title = fields
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| AppError::BadRequest("Title is required".to_string()))?;
    let price = fields
        .price
        .ok_or_else(|| AppError::BadRequest("Price is required".to_string()))?;
    if price < Decimal::ZERO {
        return Err(AppError::BadRequest("Price cannot be negative".to_string()));
    }

    // Screen every image before anything reaches storage
    if let Some(moderation) = state.moderation() {
        for image in &fields.images {
            let verdict = moderation
                .screen_image(&image.file_name, &image.content_type, image.bytes.clone())
                .await?;
            if !verdict.approved {
                tracing::info!(
                    file_name = %image.file_name,
                    detected = ?verdict.detected_objects,
                    "Product image rejected by moderation"
                );
                return Err(AppError::BadRequest(verdict.message));
            }
        }
    }

    let mut image_urls = Vec::with_capacity(fields.images.len());
    for image in fields.images {
        let key = state
            .market()
            .upload_image(
                &vendor.token,
                &image.file_name,
                &image.content_type,
                image.bytes,
            )
            .await?;
        image_urls.push(key);
    }

    let product = state
        .market()
        .create_product(
            &vendor.token,
            &NewProduct {
                title,
                description: fields.description,
                price,
                category: fields.category,
                image_urls,
                quantity: fields.quantity,
                return_policy: fields.return_policy,
            },
        )
        .await?;

    tracing::info!(product_id = %product.id, "Product created");

    Ok(Json(ProductView::from(&product)))
}

/// The vendor's orders.
#[instrument(skip(state, vendor))]
pub async fn orders(
    State(state): State<AppState>,
    RequireVendor(vendor): RequireVendor,
) -> Result<Json<Vec<OrderView>>> {
    let orders = state.market().list_orders(&vendor.token).await?;
    Ok(Json(orders.iter().map(OrderView::from).collect()))
}

/// Drain the multipart form into its fields.
async fn read_product_form(mut multipart: Multipart) -> Result<ProductFormFields> {
    let mut fields = ProductFormFields::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("Invalid form: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();

        match name.as_str() {
            "title" => fields.title = Some(read_text(field, &name).await?),
            "description" => fields.description = Some(read_text(field, &name).await?),
            "category" => fields.category = Some(read_text(field, &name).await?),
            "return_policy" => fields.return_policy = Some(read_text(field, &name).await?),
            "price" => {
                let text = read_text(field, &name).await?;
                let price = text.trim().parse::<Decimal>().map_err(|_| {
                    AppError::BadRequest("Price must be a number".to_string())
                })?;
                fields.price = Some(price);
            }
            "quantity" => {
                let text = read_text(field, &name).await?;
                let quantity = text.trim().parse::<u32>().map_err(|_| {
                    AppError::BadRequest("Quantity must be a whole number".to_string())
                })?;
                fields.quantity = Some(quantity);
            }
            "images" => {
                let file_name = field
                    .file_name()
                    .unwrap_or("image.jpg")
                    .to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("image/jpeg")
                    .to_string();
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(format!("Failed to read image: {e}")))?;
                fields.images.push(StagedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            _ => {
                // Unknown fields are ignored, matching the form's tolerance
            }
        }
    }

    Ok(fields)
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("Failed to read {name}: {e}")))
}
