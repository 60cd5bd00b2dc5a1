//! Per-visitor and shared state containers.
//!
//! - [`cart`]: the session's cart.
//! - [`favorites`]: saved products, written through to a [`kv::KeyValueStore`].
//! - [`auth`]: identity and role resolution.
//! - [`catalog`]: cached product listings.

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod favorites;
pub mod kv;

pub use auth::AuthStore;
pub use cart::{Cart, CartLineItem, LineKey};
pub use catalog::{CatalogStore, Listing};
pub use favorites::FavoritesStore;
pub use kv::{KeyValueStore, MemoryKeyValueStore, StoreError};
