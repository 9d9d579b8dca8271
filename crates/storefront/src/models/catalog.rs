//! Catalog entities.

use rust_decimal::Decimal;
use serde::Serialize;

use clover_market_core::ProductId;

/// A catalog product.
///
/// The `category` field carries the joined category name (products without a
/// category are grouped under "Uncategorized" at the route layer). Stock is
/// advisory: it gates cart adds and snapshot visibility but is never
/// decremented by order placement.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub stock: i32,
    pub category: Option<String>,
    pub image_url: Option<String>,
}

impl Product {
    /// Whether the product can currently be added to a cart.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.stock > 0
    }
}
