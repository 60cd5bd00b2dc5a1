//! Prime Optic Core - Shared types library.
//!
//! This crate provides common types used across all Prime Optic components:
//! - `storefront` - Public-facing shop (catalog, cart, checkout, eye exams, admin API)
//! - `cli` - Command-line tools for migrations, catalog seeding and user roles
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for document IDs, prices, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
