//! HTTP route handlers for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                              - Liveness
//! GET    /health/ready                        - Readiness (pings the database)
//!
//! # Catalog
//! GET    /api/products?type=&q=&filters=&sort= - Filtered listing of one type
//! GET    /api/products/{slug}                  - Product detail
//! GET    /api/brands                           - Featured brands
//! GET    /api/brands/{slug}/products           - Filtered listing of one brand
//! GET    /api/stores                           - Shop directory
//!
//! # Cart (session)
//! GET    /api/cart                             - Cart with subtotal
//! POST   /api/cart/items                       - Add (merges on product + filter)
//! PUT    /api/cart/items/{productId}           - Set quantity
//! DELETE /api/cart/items/{productId}           - Remove (?addBlueLightFilter=)
//! DELETE /api/cart                             - Clear
//!
//! # Favorites (device)
//! GET    /api/favorites                        - Saved products
//! DELETE /api/favorites                        - Clear
//! POST   /api/favorites/{productId}            - Save
//! GET    /api/favorites/{productId}            - Is saved?
//! DELETE /api/favorites/{productId}            - Forget
//!
//! # Checkout (session)
//! GET    /api/checkout                         - Wizard state and totals
//! PUT    /api/checkout/contact                 - Step 1 fields
//! PUT    /api/checkout/delivery                - Step 2 fields
//! POST   /api/checkout/next                    - Advance (guarded)
//! POST   /api/checkout/back                    - Go back
//! POST   /api/checkout/submit                  - Place the order
//!
//! # Appointments
//! GET    /api/appointments/slots               - Bookable time slots
//! POST   /api/appointments                     - Book an eye exam
//!
//! # Auth
//! POST   /api/auth/sign-up
//! POST   /api/auth/sign-in
//! POST   /api/auth/sign-out
//! GET    /api/auth/me
//!
//! # Account (requires auth)
//! GET    /api/account/orders
//! GET    /api/account/appointments
//!
//! # Admin (requires admin role)
//! GET    /api/admin/products
//! POST   /api/admin/products
//! PUT    /api/admin/products/{id}
//! DELETE /api/admin/products/{id}
//! ```

pub mod account;
pub mod admin;
pub mod appointments;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod favorites;
pub mod health;
pub mod products;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::state::AppState;

/// Create the catalog routes router.
pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(products::index))
        .route("/products/{slug}", get(products::show))
        .route("/brands", get(products::brands))
        .route("/brands/{slug}/products", get(products::brand_products))
        .route("/stores", get(products::stores))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{product_id}",
            put(cart::update).delete(cart::remove),
        )
}

/// Create the favorites routes router.
pub fn favorites_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(favorites::index).delete(favorites::clear))
        .route(
            "/{product_id}",
            get(favorites::status)
                .post(favorites::add)
                .delete(favorites::remove),
        )
}

/// Create the checkout routes router.
pub fn checkout_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(checkout::show))
        .route("/contact", put(checkout::update_contact))
        .route("/delivery", put(checkout::update_delivery))
        .route("/next", post(checkout::next))
        .route("/back", post(checkout::back))
        .route("/submit", post(checkout::submit))
}

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::me))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(account::orders))
        .route("/appointments", get(account::appointments))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(admin::index).post(admin::create))
        .route("/products/{id}", put(admin::update).delete(admin::delete))
}

/// Create all API routes, nested under `/api`.
pub fn routes() -> Router<AppState> {
    let api = Router::new()
        .merge(catalog_routes())
        .nest("/cart", cart_routes())
        .nest("/favorites", favorites_routes())
        .nest("/checkout", checkout_routes())
        .route("/appointments", post(appointments::create))
        .route("/appointments/slots", get(appointments::slots))
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/admin", admin_routes());

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .nest("/api", api)
}
