//! Domain models for the storefront.

pub mod appointment;
pub mod order;
pub mod product;
pub mod session;
pub mod user;

pub use appointment::{Appointment, AppointmentRequest, NewAppointment, TimeSlot, format_time_slot};
pub use order::{CustomerInfo, DeliveryAddress, DeliveryInfo, DeliveryOption, NewOrder, Order};
pub use product::{
    ColorOption, FrameMaterial, FrameShape, Gender, LensOption, Product, ProductData, ProductType,
};
pub use session as session_keys;
pub use user::{CurrentUser, Identity, UserProfile};
