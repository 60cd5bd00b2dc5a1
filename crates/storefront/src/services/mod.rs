//! Business logic between the HTTP handlers and the backend.
//!
//! - [`orders`]: building and placing orders from the cart and checkout.
//! - [`appointments`]: eye exam booking.
//! - [`notify`]: notifications and readable error messages.

pub mod appointments;
pub mod notify;
pub mod orders;

pub use notify::{Notification, readable_message};
