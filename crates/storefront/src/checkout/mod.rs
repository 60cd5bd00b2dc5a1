//! Checkout: the step wizard, delivery options and order totals.

pub mod delivery;
pub mod flow;
pub mod pricing;

pub use delivery::{delivery_options, find_option};
pub use flow::{CheckoutError, CheckoutState, CheckoutStep};
pub use pricing::OrderTotals;
