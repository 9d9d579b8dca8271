//! Database operations for the storefront `PostgreSQL` instance.
//!
//! # Schema: `shop`
//!
//! - `category` - Product categories
//! - `product` - The catalog (price, stock, optional category/image)
//! - `customer` - Checkout contacts, upserted by unique email
//! - `shop_order` - Placed orders with an immutable JSONB line-item snapshot
//! - `tower_sessions.session` - Session storage (managed by tower-sessions)
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and run automatically
//! at startup.

pub mod orders;
pub mod products;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use orders::OrderRepository;
pub use products::ProductRepository;

/// Errors surfaced by the repository layer.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Underlying database failure.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A uniqueness constraint was violated.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value could not be interpreted.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
