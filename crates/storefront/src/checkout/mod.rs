//! Checkout order assembly.
//!
//! Turns {persisted cart snapshot, shipping form, payment method} into one
//! order-creation request. The draft is ephemeral: it exists between form
//! submission and the backend answering with an order id, and is never
//! persisted itself.
//!
//! Validation is presence-only (plus numeric phone), exactly what the
//! checkout form enforces before a request is allowed out. Shipping is a
//! fixed "Free" label - the total is the item sum, no tax and no shipping
//! fee.

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;

use mboa_market_core::Phone;

use crate::api::types::{CreateOrderRequest, OrderItemInput, PaymentMethod};
use crate::cart::{CartLine, ops};

/// What the order summary shows for shipping. Displayed, never added to
/// the total.
pub const SHIPPING_LABEL: &str = "Free";

/// Errors that block a checkout submission.
///
/// Every variant is a client-side rejection: when assembly fails, no
/// request is sent and the cart is untouched.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("Your cart is empty")]
    EmptyCart,

    /// A required shipping field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// The phone number is not numeric.
    #[error("Phone number must contain only digits")]
    InvalidPhone,
}

/// Shipping address form, collected separately from the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingForm {
    pub customer_name: String,
    pub customer_phone: String,
    pub delivery_address: String,
    pub city: String,
    pub region: String,
}

impl ShippingForm {
    /// Presence validation for every field, numeric validation for the
    /// phone. No format validation beyond that.
    ///
    /// # Errors
    ///
    /// Returns the first failing field.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        require(&self.customer_name, "Full name")?;
        require(&self.customer_phone, "Phone number")?;
        require(&self.delivery_address, "Delivery address")?;
        require(&self.city, "City")?;
        require(&self.region, "Region")?;

        if Phone::parse(self.customer_phone.trim()).is_err() {
            return Err(CheckoutError::InvalidPhone);
        }

        Ok(())
    }
}

fn require(value: &str, field: &'static str) -> Result<(), CheckoutError> {
    if value.trim().is_empty() {
        return Err(CheckoutError::MissingField(field));
    }
    Ok(())
}

/// An assembled, validated order ready to submit.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub items: Vec<OrderItemInput>,
    pub total: Decimal,
    pub shipping: ShippingForm,
    pub payment_method: PaymentMethod,
}

impl OrderDraft {
    /// Assemble an order draft from the cart snapshot and the shipping
    /// form.
    ///
    /// Each cart line maps to `{product_id, quantity, price}`; the total is
    /// the sum of `price * quantity` across all lines.
    ///
    /// # Errors
    ///
    /// Returns a [`CheckoutError`] when the cart is empty or the form is
    /// incomplete - in either case nothing has left the process.
    pub fn assemble(
        cart: &[CartLine],
        shipping: ShippingForm,
        payment_method: PaymentMethod,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        shipping.validate()?;

        let items = cart
            .iter()
            .map(|line| OrderItemInput {
                product_id: line.product_id,
                quantity: line.quantity,
                price: line.unit_price,
            })
            .collect();

        Ok(Self {
            items,
            total: ops::subtotal(cart),
            shipping,
            payment_method,
        })
    }

    /// The order-creation request body for this draft.
    #[must_use]
    pub fn into_request(self) -> CreateOrderRequest {
        CreateOrderRequest {
            customer_name: self.shipping.customer_name,
            customer_phone: self.shipping.customer_phone,
            delivery_address: self.shipping.delivery_address,
            city: self.shipping.city,
            region: self.shipping.region,
            payment_method: self.payment_method,
            items: self.items,
            total: self.total,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::line::tests::product;
    use crate::cart::ops::add_item;
    use uuid::Uuid;

    fn shipping() -> ShippingForm {
        ShippingForm {
            customer_name: "Ngono Marie".to_string(),
            customer_phone: "675123456".to_string(),
            delivery_address: "Rue 1.234, Bastos".to_string(),
            city: "Yaoundé".to_string(),
            region: "Centre".to_string(),
        }
    }

    #[test]
    fn test_total_is_sum_of_price_times_quantity() {
        let a = product(Uuid::new_v4(), "A", 1000);
        let b = product(Uuid::new_v4(), "B", 500);
        let cart = add_item(add_item(Vec::new(), &a, 2), &b, 1);

        let draft = OrderDraft::assemble(&cart, shipping(), PaymentMethod::MobileMoney).unwrap();

        assert_eq!(draft.total, Decimal::from(2500));
        assert_eq!(draft.items.len(), 2);
    }

    #[test]
    fn test_items_carry_snapshot_prices() {
        let a = product(Uuid::new_v4(), "A", 1000);
        let cart = add_item(Vec::new(), &a, 2);

        let draft = OrderDraft::assemble(&cart, shipping(), PaymentMethod::Cash).unwrap();
        let item = draft.items.first().unwrap();

        assert_eq!(item.product_id, a.id);
        assert_eq!(item.quantity, 2);
        assert_eq!(item.price, Decimal::from(1000));
    }

    #[test]
    fn test_empty_cart_blocks_submission() {
        let result = OrderDraft::assemble(&[], shipping(), PaymentMethod::Card);
        assert_eq!(result.unwrap_err(), CheckoutError::EmptyCart);
    }

    #[test]
    fn test_blank_delivery_address_blocks_submission() {
        let a = product(Uuid::new_v4(), "A", 1000);
        let cart = add_item(Vec::new(), &a, 1);

        let mut form = shipping();
        form.delivery_address = "   ".to_string();

        let result = OrderDraft::assemble(&cart, form, PaymentMethod::MobileMoney);
        assert_eq!(
            result.unwrap_err(),
            CheckoutError::MissingField("Delivery address")
        );
    }

    #[test]
    fn test_every_shipping_field_is_required() {
        let blank_out: [fn(&mut ShippingForm); 5] = [
            |f| f.customer_name.clear(),
            |f| f.customer_phone.clear(),
            |f| f.delivery_address.clear(),
            |f| f.city.clear(),
            |f| f.region.clear(),
        ];

        for blank in blank_out {
            let mut form = shipping();
            blank(&mut form);
            assert!(form.validate().is_err());
        }
    }

    #[test]
    fn test_non_numeric_phone_blocks_submission() {
        let mut form = shipping();
        form.customer_phone = "six seven five".to_string();
        assert_eq!(form.validate().unwrap_err(), CheckoutError::InvalidPhone);
    }

    #[test]
    fn test_into_request_wires_all_fields() {
        let a = product(Uuid::new_v4(), "A", 1000);
        let cart = add_item(Vec::new(), &a, 1);

        let request = OrderDraft::assemble(&cart, shipping(), PaymentMethod::MobileMoney)
            .unwrap()
            .into_request();

        assert_eq!(request.customer_name, "Ngono Marie");
        assert_eq!(request.city, "Yaoundé");
        assert_eq!(request.total, Decimal::from(1000));
        assert_eq!(request.payment_method, PaymentMethod::MobileMoney);
    }
}
