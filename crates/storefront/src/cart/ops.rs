//! Pure cart mutators.
//!
//! Each function computes a new line list from an action; persistence is
//! the store's job. Keeping these pure makes the cart invariants
//! (`quantity >= 1`, one line per product) directly testable.

use rust_decimal::Decimal;

use mboa_market_core::ProductId;

use crate::api::types::Product;

use super::CartLine;

/// Add a product to the cart.
///
/// If a line with the same product already exists its quantity increases by
/// `quantity`; otherwise a new line is appended with a display snapshot of
/// the product taken now. A requested quantity of 0 counts as 1.
#[must_use]
pub fn add_item(mut items: Vec<CartLine>, product: &Product, quantity: u32) -> Vec<CartLine> {
    let quantity = quantity.max(1);

    if let Some(line) = items.iter_mut().find(|line| line.product_id == product.id) {
        line.quantity = line.quantity.saturating_add(quantity);
    } else {
        items.push(CartLine::snapshot(product, quantity));
    }

    items
}

/// Set the quantity of a line.
///
/// A quantity of 0 removes the line (the `quantity >= 1` invariant).
/// An absent product id leaves the list unchanged - the caller still
/// persists the result.
#[must_use]
pub fn update_quantity(items: Vec<CartLine>, product_id: ProductId, quantity: u32) -> Vec<CartLine> {
    if quantity == 0 {
        return remove_item(items, product_id);
    }

    items
        .into_iter()
        .map(|mut line| {
            if line.product_id == product_id {
                line.quantity = quantity;
            }
            line
        })
        .collect()
}

/// Remove a line from the cart.
#[must_use]
pub fn remove_item(items: Vec<CartLine>, product_id: ProductId) -> Vec<CartLine> {
    items
        .into_iter()
        .filter(|line| line.product_id != product_id)
        .collect()
}

/// The navigation badge count: the sum of quantities across all lines,
/// not the number of distinct lines.
#[must_use]
pub fn badge_count(items: &[CartLine]) -> u32 {
    items.iter().map(|line| line.quantity).sum()
}

/// Cart subtotal: the sum of line totals.
#[must_use]
pub fn subtotal(items: &[CartLine]) -> Decimal {
    items.iter().map(CartLine::line_total).sum()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::line::tests::product;
    use uuid::Uuid;

    #[test]
    fn test_distinct_adds_append_lines() {
        let a = product(Uuid::new_v4(), "Basket", 15000);
        let b = product(Uuid::new_v4(), "Coffee", 8500);
        let c = product(Uuid::new_v4(), "Jewelry", 24000);

        let mut items = Vec::new();
        for p in [&a, &b, &c] {
            items = add_item(items, p, 1);
        }

        // Cart length equals the number of distinct ids, each at quantity 1
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|line| line.quantity == 1));
    }

    #[test]
    fn test_repeated_adds_merge_quantities() {
        let p = product(Uuid::new_v4(), "Basket", 15000);

        let items = add_item(Vec::new(), &p, 1);
        let items = add_item(items, &p, 1);
        let items = add_item(items, &p, 1);

        assert_eq!(items.len(), 1);
        assert_eq!(items.first().unwrap().quantity, 3);
    }

    #[test]
    fn test_add_twice_remove_once_empties_cart() {
        let p = product(Uuid::new_v4(), "Basket", 15000);

        let items = add_item(Vec::new(), &p, 1);
        let items = add_item(items, &p, 1);
        let items = remove_item(items, p.id);

        assert!(items.is_empty());
    }

    #[test]
    fn test_update_to_zero_equals_remove() {
        let a = product(Uuid::new_v4(), "Basket", 15000);
        let b = product(Uuid::new_v4(), "Coffee", 8500);

        let items = add_item(add_item(Vec::new(), &a, 1), &b, 1);

        let via_update = update_quantity(items.clone(), a.id, 0);
        let via_remove = remove_item(items, a.id);

        assert_eq!(via_update, via_remove);
    }

    #[test]
    fn test_update_replaces_quantity() {
        let p = product(Uuid::new_v4(), "Basket", 15000);
        let items = add_item(Vec::new(), &p, 2);
        let items = update_quantity(items, p.id, 5);
        assert_eq!(items.first().unwrap().quantity, 5);
    }

    #[test]
    fn test_update_absent_id_is_noop() {
        let p = product(Uuid::new_v4(), "Basket", 15000);
        let items = add_item(Vec::new(), &p, 2);
        let updated = update_quantity(items.clone(), ProductId::new(Uuid::new_v4()), 7);
        assert_eq!(updated, items);
    }

    #[test]
    fn test_badge_counts_quantities_not_lines() {
        let a = product(Uuid::new_v4(), "Basket", 15000);
        let b = product(Uuid::new_v4(), "Coffee", 8500);

        // N distinct qty-1 adds -> N
        let items = add_item(add_item(Vec::new(), &a, 1), &b, 1);
        assert_eq!(badge_count(&items), 2);

        // One add of quantity 3 -> 3
        let items = add_item(Vec::new(), &a, 3);
        assert_eq!(badge_count(&items), 3);
    }

    #[test]
    fn test_subtotal_sums_line_totals() {
        let a = product(Uuid::new_v4(), "A", 1000);
        let b = product(Uuid::new_v4(), "B", 500);

        let items = add_item(add_item(Vec::new(), &a, 2), &b, 1);
        assert_eq!(subtotal(&items), Decimal::from(2500));
    }

    #[test]
    fn test_empty_cart_sums_to_zero() {
        assert_eq!(badge_count(&[]), 0);
        assert_eq!(subtotal(&[]), Decimal::ZERO);
    }
}
