//! Cart pricing: joining cart quantities against catalog prices.
//!
//! Pure functions over already-fetched data. All arithmetic is
//! `rust_decimal::Decimal`, so the total shown on the cart page and the total
//! computed at checkout are bit-identical for an unchanged cart and catalog.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;

use clover_market_core::ProductId;

use crate::models::{Cart, Product};

/// One priced cart line for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartLine {
    pub product_id: ProductId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub subtotal: Decimal,
    pub image_url: Option<String>,
}

/// A priced view of the cart at one instant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CartSnapshot {
    pub lines: Vec<CartLine>,
    pub total: Decimal,
}

/// Join the cart against the given available products.
///
/// Cart entries whose product is not in `available` (deleted or out of
/// stock) simply vanish from the snapshot; the cart itself is not modified
/// by this read path. Lines come out in ascending product-id order.
#[must_use]
pub fn snapshot(cart: &Cart, available: &[Product]) -> CartSnapshot {
    let by_id: HashMap<ProductId, &Product> =
        available.iter().map(|p| (p.id, p)).collect();

    let mut lines = Vec::new();
    let mut total = Decimal::ZERO;

    for (product_id, quantity) in cart.iter() {
        let Some(product) = by_id.get(&product_id) else {
            continue;
        };
        let subtotal = product.price * Decimal::from(quantity);
        total += subtotal;
        lines.push(CartLine {
            product_id,
            name: product.name.clone(),
            unit_price: product.price,
            quantity,
            subtotal,
            image_url: product.image_url.clone(),
        });
    }

    CartSnapshot { lines, total }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(id: i32, price: &str, stock: i32) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            description: String::new(),
            price: price.parse().unwrap(),
            stock,
            category: None,
            image_url: None,
        }
    }

    #[test]
    fn test_empty_cart_snapshot() {
        let snap = snapshot(&Cart::default(), &[product(1, "10.00", 5)]);
        assert!(snap.lines.is_empty());
        assert_eq!(snap.total, Decimal::ZERO);
    }

    #[test]
    fn test_totals_are_exact() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(1), 2);
        cart.set_quantity(ProductId::new(2), 1);

        let catalog = [product(1, "10.00", 5), product(2, "5.00", 5)];
        let snap = snapshot(&cart, &catalog);

        assert_eq!(snap.total, "25.00".parse::<Decimal>().unwrap());
        assert_eq!(snap.lines.len(), 2);
        assert_eq!(snap.lines[0].subtotal, "20.00".parse::<Decimal>().unwrap());
        assert_eq!(snap.lines[1].subtotal, "5.00".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_unavailable_products_vanish_without_mutating_cart() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(1), 3);
        cart.set_quantity(ProductId::new(2), 1);

        // product 2 is not in the available set
        let snap = snapshot(&cart, &[product(1, "2.50", 1)]);
        assert_eq!(snap.lines.len(), 1);
        assert_eq!(snap.total, "7.50".parse::<Decimal>().unwrap());

        // the stored quantity survives the read
        assert_eq!(cart.quantity(ProductId::new(2)), Some(1));
    }

    #[test]
    fn test_snapshot_is_deterministic() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(7), 4);
        let catalog = [product(7, "0.10", 9)];

        // display-time and checkout-time pricing must agree
        assert_eq!(snapshot(&cart, &catalog), snapshot(&cart, &catalog));
    }

    #[test]
    fn test_no_float_drift() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(1), 3);
        let snap = snapshot(&cart, &[product(1, "0.10", 10)]);
        // 3 * 0.10 is exactly 0.30, not 0.30000000000000004
        assert_eq!(snap.total, "0.30".parse::<Decimal>().unwrap());
    }
}
