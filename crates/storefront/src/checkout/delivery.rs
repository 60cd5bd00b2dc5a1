//! Delivery options offered at checkout.

use prime_optic_core::Price;

use crate::models::DeliveryOption;

pub const PICKUP: &str = "pickup";
pub const HOME_DELIVERY: &str = "home_delivery";

/// Collect from the store. Free.
#[must_use]
pub fn pickup() -> DeliveryOption {
    DeliveryOption {
        id: PICKUP.to_string(),
        name: "Store Pickup".to_string(),
        description: "Pick up from our store - no extra charge".to_string(),
        price: Price::ZERO,
        estimated_days: "1-2 business days".to_string(),
    }
}

/// Courier to the customer's address. Flat 2 EUR.
#[must_use]
pub fn home_delivery() -> DeliveryOption {
    DeliveryOption {
        id: HOME_DELIVERY.to_string(),
        name: "Home Delivery".to_string(),
        description: "Delivered to your address".to_string(),
        price: Price::from_units(2),
        estimated_days: "2-4 business days".to_string(),
    }
}

/// Every option, default first.
#[must_use]
pub fn delivery_options() -> Vec<DeliveryOption> {
    vec![pickup(), home_delivery()]
}

#[must_use]
pub fn find_option(id: &str) -> Option<DeliveryOption> {
    delivery_options().into_iter().find(|option| option.id == id)
}
