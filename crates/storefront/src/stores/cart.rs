//! Shopping cart.
//!
//! A cart is an ordered list of line items. Two lines never share a
//! [`LineKey`]: adding a product that is already in the cart with the same
//! blue-light-filter choice increases that line's quantity instead.
//!
//! Every operation is a plain state transition with no failure mode. The
//! cart is stored in the visitor's session between requests.

use std::fmt;

use serde::{Deserialize, Serialize};

use prime_optic_core::{Price, ProductId};

use crate::models::Product;

/// Identity of a cart line: product plus blue-light-filter choice.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    pub product_id: ProductId,
    pub add_blue_light_filter: bool,
}

impl LineKey {
    #[must_use]
    pub fn new(product_id: impl Into<ProductId>, add_blue_light_filter: bool) -> Self {
        Self {
            product_id: product_id.into(),
            add_blue_light_filter,
        }
    }
}

impl fmt::Display for LineKey {
    /// `p1` or `p1-bluefilter`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.add_blue_light_filter {
            write!(f, "{}-bluefilter", self.product_id)
        } else {
            write!(f, "{}", self.product_id)
        }
    }
}

/// A product snapshot in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    /// Unit price at the time the product was added.
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub quantity: u32,
    #[serde(default)]
    pub add_blue_light_filter: bool,
}

impl CartLineItem {
    /// A line for `product` with quantity 0; [`Cart::add_item`] sets the
    /// quantity.
    #[must_use]
    pub fn from_product(product: &Product, add_blue_light_filter: bool) -> Self {
        Self {
            product_id: product.id.clone(),
            name: product.name.clone(),
            price: product.price,
            image_url: product.image_url.clone(),
            quantity: 0,
            add_blue_light_filter,
        }
    }

    #[must_use]
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.add_blue_light_filter)
    }

    fn has_key(&self, key: &LineKey) -> bool {
        self.product_id == key.product_id && self.add_blue_light_filter == key.add_blue_light_filter
    }

    /// `price * quantity`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The visitor's cart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines in the order they were first added.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find the line with this key.
    #[must_use]
    pub fn line(&self, key: &LineKey) -> Option<&CartLineItem> {
        self.items.iter().find(|item| item.has_key(key))
    }

    /// Add `quantity` of `item`.
    ///
    /// If a line with the same key exists its quantity grows by `quantity`;
    /// otherwise `item` is appended with exactly `quantity`. The incoming
    /// item's own quantity is ignored.
    pub fn add_item(&mut self, item: CartLineItem, quantity: u32) {
        let key = item.key();
        if let Some(existing) = self.items.iter_mut().find(|line| line.has_key(&key)) {
            existing.quantity = existing.quantity.saturating_add(quantity);
            return;
        }
        self.items.push(CartLineItem { quantity, ..item });
    }

    /// Delete the line with this key; no-op if absent.
    pub fn remove_item(&mut self, key: &LineKey) {
        self.items.retain(|item| !item.has_key(key));
    }

    /// Set a line's quantity; no-op if absent.
    ///
    /// The value is stored as given. Callers clamp to at least 1.
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) {
        if let Some(line) = self.items.iter_mut().find(|item| item.has_key(key)) {
            line.quantity = quantity;
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of `price * quantity` over every line.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Total number of units in the cart.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0, |count, item| count.saturating_add(item.quantity))
    }
}
