//! The session-backed shopping cart.
//!
//! A cart is an explicit value object: handlers load it from the session,
//! mutate it, and save it back. It never holds product data, only desired
//! quantities; prices are joined in at read time by the pricing service.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tower_sessions::Session;

use clover_market_core::ProductId;

use super::session_keys;

/// A mapping of product id to desired quantity.
///
/// Invariant: every stored quantity is at least 1. Mutations that would drop
/// a quantity to zero or below remove the entry instead.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: BTreeMap<ProductId, u32>,
}

impl Cart {
    /// Load the cart from the session, defaulting to empty on first access.
    pub async fn load(session: &Session) -> Self {
        session
            .get::<Self>(session_keys::CART)
            .await
            .ok()
            .flatten()
            .unwrap_or_default()
    }

    /// Persist the cart to the session.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be modified.
    pub async fn save(&self, session: &Session) -> Result<(), tower_sessions::session::Error> {
        session.insert(session_keys::CART, self).await
    }

    /// Increment the quantity for a product by one, starting at 1 if absent.
    ///
    /// Availability is the caller's concern: routes check the catalog before
    /// calling this.
    pub fn add(&mut self, product_id: ProductId) {
        let quantity = self.items.entry(product_id).or_insert(0);
        *quantity = quantity.saturating_add(1);
    }

    /// Decrement the quantity for a product by one, removing the entry when
    /// it reaches zero. No-op if the product is not in the cart.
    pub fn remove_one(&mut self, product_id: ProductId) {
        if let Some(quantity) = self.items.get_mut(&product_id) {
            if *quantity <= 1 {
                self.items.remove(&product_id);
            } else {
                *quantity -= 1;
            }
        }
    }

    /// Overwrite the quantity for a product. A quantity of zero or below
    /// removes the entry (no-op if absent).
    pub fn set_quantity(&mut self, product_id: ProductId, quantity: i64) {
        match u32::try_from(quantity) {
            Ok(q) if q > 0 => {
                self.items.insert(product_id, q);
            }
            _ => {
                self.items.remove(&product_id);
            }
        }
    }

    /// Remove every entry. Clearing an empty cart is a no-op.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Whether the cart has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Desired quantity for a product, if present.
    #[must_use]
    pub fn quantity(&self, product_id: ProductId) -> Option<u32> {
        self.items.get(&product_id).copied()
    }

    /// Product ids currently in the cart, in ascending id order.
    #[must_use]
    pub fn product_ids(&self) -> Vec<ProductId> {
        self.items.keys().copied().collect()
    }

    /// Iterate over (product id, quantity) pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (ProductId, u32)> + '_ {
        self.items.iter().map(|(id, q)| (*id, *q))
    }
}
