//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use mboa_market_core::ProductId;

use crate::api::types::Product;

/// Category recorded when the product has none.
const FALLBACK_CATEGORY: &str = "Uncategorized";

/// Image reference recorded when the product has no images.
const FALLBACK_IMAGE: &str = "/placeholder.svg";

/// Return policy text recorded when the product specifies none.
const FALLBACK_RETURN_POLICY: &str = "No return policy specified";

/// One product-quantity pairing held in the shopping cart.
///
/// Besides the product reference and quantity, a line carries a display
/// snapshot of the product **as it looked when added** (name, unit price,
/// category, image, return policy). The snapshot may drift from the live
/// product record; that is by contract - the cart shows what the shopper
/// put in it.
///
/// Invariant: `quantity >= 1`. Mutations that would drop below 1 remove
/// the line instead (enforced by [`crate::cart::ops`]).
///
/// The serialized field names (`id`, `price`, `image`, `returnPolicy`) are
/// the persisted storage format and must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_id: ProductId,
    pub name: String,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
    pub quantity: u32,
    pub category: String,
    #[serde(rename = "image")]
    pub image_ref: String,
    #[serde(rename = "returnPolicy")]
    pub return_policy_text: String,
}

impl CartLine {
    /// Snapshot a product into a new cart line.
    #[must_use]
    pub fn snapshot(product: &Product, quantity: u32) -> Self {
        Self {
            product_id: product.id,
            name: product.title.clone(),
            unit_price: product.price,
            quantity: quantity.max(1),
            category: product
                .category
                .clone()
                .unwrap_or_else(|| FALLBACK_CATEGORY.to_string()),
            image_ref: product
                .image_urls
                .first()
                .cloned()
                .unwrap_or_else(|| FALLBACK_IMAGE.to_string()),
            return_policy_text: product
                .return_policy
                .clone()
                .unwrap_or_else(|| FALLBACK_RETURN_POLICY.to_string()),
        }
    }

    /// Price of this line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;
    use chrono::Utc;
    use mboa_market_core::UserId;
    use uuid::Uuid;

    /// Test fixture: a catalog product.
    pub(crate) fn product(id: Uuid, title: &str, price: i64) -> Product {
        Product {
            id: ProductId::new(id),
            seller_id: UserId::new(Uuid::new_v4()),
            title: title.to_string(),
            description: None,
            price: Decimal::from(price),
            category: Some("Crafts".to_string()),
            image_urls: vec!["crafts/basket.jpg".to_string()],
            return_policy: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_snapshot_captures_display_fields() {
        let p = product(Uuid::new_v4(), "Bamboo Basket", 15000);
        let line = CartLine::snapshot(&p, 2);

        assert_eq!(line.product_id, p.id);
        assert_eq!(line.name, "Bamboo Basket");
        assert_eq!(line.unit_price, Decimal::from(15000));
        assert_eq!(line.quantity, 2);
        assert_eq!(line.category, "Crafts");
        assert_eq!(line.image_ref, "crafts/basket.jpg");
        assert_eq!(line.return_policy_text, "No return policy specified");
    }

    #[test]
    fn test_snapshot_applies_fallbacks() {
        let mut p = product(Uuid::new_v4(), "Basket", 1000);
        p.category = None;
        p.image_urls = vec![];

        let line = CartLine::snapshot(&p, 1);
        assert_eq!(line.category, "Uncategorized");
        assert_eq!(line.image_ref, "/placeholder.svg");
    }

    #[test]
    fn test_snapshot_clamps_zero_quantity() {
        let p = product(Uuid::new_v4(), "Basket", 1000);
        assert_eq!(CartLine::snapshot(&p, 0).quantity, 1);
    }

    #[test]
    fn test_line_total() {
        let p = product(Uuid::new_v4(), "Basket", 1500);
        let line = CartLine::snapshot(&p, 3);
        assert_eq!(line.line_total(), Decimal::from(4500));
    }

    #[test]
    fn test_persisted_field_names() {
        let p = product(Uuid::new_v4(), "Basket", 1500);
        let line = CartLine::snapshot(&p, 1);
        let value = serde_json::to_value(&line).unwrap();

        // Storage format compatibility: these names are load-bearing
        assert!(value.get("id").is_some());
        assert!(value.get("price").is_some());
        assert!(value.get("image").is_some());
        assert!(value.get("returnPolicy").is_some());
        assert!(value.get("product_id").is_none());
    }
}
