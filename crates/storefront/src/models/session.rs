//! Session keys.
//!
//! Per-visitor state (cart, checkout wizard, signed-in user, favorites owner)
//! lives in the server-side session under these keys.

/// The signed-in [`CurrentUser`](super::CurrentUser).
pub const CURRENT_USER: &str = "current_user";

/// The visitor's [`Cart`](crate::stores::Cart).
pub const CART: &str = "cart";

/// The visitor's [`CheckoutState`](crate::checkout::CheckoutState).
pub const CHECKOUT: &str = "checkout";

/// Anonymous device id used to key guest favorites.
pub const DEVICE_ID: &str = "device_id";
