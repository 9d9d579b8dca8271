//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - In-stock products grouped by category
//! GET  /health                 - Health check
//! GET  /health/ready           - Readiness check (database ping)
//!
//! # Catalog
//! GET  /products               - Full catalog grouped by category
//! GET  /search?query=          - Case-insensitive name search
//!
//! # Cart
//! GET  /cart                   - Priced cart snapshot
//! GET  /cart?add=<id>          - Add one unit, redirect back
//! GET  /cart?remove=<id>       - Remove one unit, redirect back
//! POST /cart/update            - Bulk set-quantities ({product_id, quantity} pairs)
//!
//! # Checkout
//! GET  /checkout               - Checkout summary for the current cart
//! POST /checkout               - Execute checkout (full_name, email, address, payment_method)
//!
//! # Orders
//! POST /track_order            - Look up an order by tracking id
//! ```

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod track;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/update", post(cart::update))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Home page
        .route("/", get(catalog::home))
        // Catalog routes
        .route("/products", get(catalog::products))
        .route("/search", get(catalog::search))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", get(checkout::show).post(checkout::submit))
        // Order tracking
        .route("/track_order", post(track::track_order))
}
