//! Order placement.

use tracing::instrument;

use prime_optic_core::OrderId;

use crate::backend::{BackendError, OrderRepository};
use crate::checkout::{CheckoutError, CheckoutState, OrderTotals};
use crate::error::add_breadcrumb;
use crate::models::{CurrentUser, NewOrder};
use crate::stores::Cart;

/// Success text shown after an order is stored.
#[must_use]
pub fn order_placed_message(id: &OrderId) -> String {
    format!(
        "Order placed successfully! Order ID: {id}. You'll receive a confirmation call within 24 hours."
    )
}

/// Snapshot the cart and wizard into an order payload.
///
/// # Errors
///
/// Returns [`CheckoutError::EmptyCart`] if there is nothing to order.
pub fn build_order(
    cart: &Cart,
    checkout: &CheckoutState,
    user: Option<&CurrentUser>,
) -> Result<NewOrder, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let totals = OrderTotals::compute(cart, &checkout.selected_delivery);
    Ok(NewOrder {
        user_id: user.map(|u| u.id.clone()),
        items: cart.items().to_vec(),
        customer_info: checkout.customer_info.clone(),
        delivery_info: checkout.delivery_info(),
        subtotal: totals.subtotal,
        delivery_fee: totals.delivery_fee,
        total: totals.total,
    })
}

/// Store the order.
///
/// # Errors
///
/// Returns the repository's error; nothing is retried.
#[instrument(skip(orders, order), fields(items = order.items.len(), total = %order.total))]
pub async fn place_order(
    orders: &dyn OrderRepository,
    order: &NewOrder,
) -> Result<OrderId, BackendError> {
    add_breadcrumb("checkout", "Placing order", None);

    let id = orders.create(order).await?;
    tracing::info!(order_id = %id, "Order placed");
    Ok(id)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::backend::memory::MemoryBackend;
    use crate::checkout::delivery::HOME_DELIVERY;
    use crate::models::{CustomerInfo, DeliveryAddress};
    use crate::stores::CartLineItem;
    use prime_optic_core::{Price, ProductId, UserId, UserRole};

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let item = CartLineItem {
            product_id: ProductId::new("p1"),
            name: "Aviator".to_string(),
            price: Price::from_units(50),
            image_url: None,
            quantity: 0,
            add_blue_light_filter: true,
        };
        cart.add_item(item, 3);
        cart
    }

    fn confirmed_checkout(option: &str) -> CheckoutState {
        let mut state = CheckoutState::new(None);
        state.set_contact(CustomerInfo {
            full_name: "Arben Hoxha".to_string(),
            email: "arben@example.com".to_string(),
            phone: "0691234567".to_string(),
        });
        state.select_delivery(option).unwrap();
        state.set_address(DeliveryAddress {
            street: "Rruga e Kavajes 5".to_string(),
            city: "Tirane".to_string(),
            ..DeliveryAddress::default()
        });
        state.advance().unwrap();
        state.advance().unwrap();
        state
    }

    #[test]
    fn test_build_order_home_delivery() {
        let user = CurrentUser {
            id: UserId::new("u1"),
            email: "arben@example.com".to_string(),
            display_name: None,
            role: UserRole::User,
        };
        let order = build_order(&cart(), &confirmed_checkout(HOME_DELIVERY), Some(&user)).unwrap();

        assert_eq!(order.user_id, Some(UserId::new("u1")));
        assert_eq!(order.subtotal, Price::from_units(150));
        assert_eq!(order.total, Price::from_units(152));
        assert_eq!(
            order.delivery_info.address.map(|a| a.city),
            Some("Tirane".to_string())
        );
        assert!(order.items.iter().all(|item| item.add_blue_light_filter));
    }

    #[test]
    fn test_pickup_order_has_no_address() {
        let order = build_order(&cart(), &confirmed_checkout("pickup"), None).unwrap();
        assert!(order.user_id.is_none());
        assert!(order.delivery_info.address.is_none());
        assert_eq!(order.total, Price::from_units(150));
    }

    #[test]
    fn test_empty_cart_is_rejected() {
        let err = build_order(&Cart::new(), &confirmed_checkout("pickup"), None).unwrap_err();
        assert_eq!(err, CheckoutError::EmptyCart);
    }

    #[tokio::test]
    async fn test_place_order_stores_it() {
        let backend = MemoryBackend::new();
        let order = build_order(&cart(), &confirmed_checkout("pickup"), None).unwrap();
        let id = place_order(&backend, &order).await.unwrap();

        assert_eq!(backend.order_count().await, 1);
        assert!(order_placed_message(&id).contains(id.as_str()));
    }
}
