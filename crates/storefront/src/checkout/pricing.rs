//! Order totals.

use serde::Serialize;

use prime_optic_core::Price;

use crate::models::DeliveryOption;
use crate::stores::Cart;

/// Subtotal, delivery fee and grand total for a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTotals {
    pub subtotal: Price,
    pub delivery_fee: Price,
    pub total: Price,
}

impl OrderTotals {
    /// `total = subtotal + delivery fee`; the fee is the option's flat price.
    #[must_use]
    pub fn compute(cart: &Cart, delivery: &DeliveryOption) -> Self {
        let subtotal = cart.subtotal();
        let delivery_fee = delivery.price;
        Self {
            subtotal,
            delivery_fee,
            total: subtotal + delivery_fee,
        }
    }
}
