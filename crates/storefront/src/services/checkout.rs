//! The checkout orchestrator.
//!
//! Validates the submitted contact form, re-resolves every cart line against
//! the catalog, snapshots the lines into an immutable order payload, and
//! persists customer + order in one transaction. The caller clears the
//! session cart only after this returns `Ok`.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use thiserror::Error;

use clover_market_core::{Email, EmailError, ProductId, TrackingId};

use crate::db::orders::NewOrder;
use crate::db::{OrderRepository, ProductRepository, RepositoryError};
use crate::models::{Cart, Order, OrderLine, Product};

/// Raw checkout form submission.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub payment_method: String,
}

/// Validated contact details, trimmed and typed.
#[derive(Debug, Clone)]
pub struct CheckoutContact {
    pub full_name: String,
    pub email: Email,
    pub address: String,
    pub payment_method: String,
}

/// Ways a checkout can fail.
///
/// Everything here is a typed return, never a panic: the route decides which
/// variants are user-recoverable (validation, not-found) and which propagate
/// as server errors.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Checkout was attempted with nothing in the cart.
    #[error("your cart is empty")]
    EmptyCart,

    /// A required field was blank or whitespace-only.
    #[error("please fill in all required fields ({0} is missing)")]
    MissingField(&'static str),

    /// The email field did not parse.
    #[error("invalid email address: {0}")]
    InvalidEmail(#[from] EmailError),

    /// A cart entry references a product id that no longer exists. Fatal for
    /// the whole checkout: skipping the line would silently corrupt the total.
    #[error("product {0} is no longer available")]
    ProductNotFound(ProductId),

    /// Storage failure (including tracking-id or email uniqueness races).
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl CheckoutForm {
    /// Trim and validate all four required fields.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::MissingField` for a blank field and
    /// `CheckoutError::InvalidEmail` for a malformed email.
    pub fn validate(&self) -> Result<CheckoutContact, CheckoutError> {
        let full_name = required(&self.full_name, "full_name")?;
        let email_raw = required(&self.email, "email")?;
        let address = required(&self.address, "address")?;
        let payment_method = required(&self.payment_method, "payment_method")?;

        let email = Email::parse(&email_raw)?;

        Ok(CheckoutContact {
            full_name,
            email,
            address,
            payment_method,
        })
    }
}

fn required(value: &str, field: &'static str) -> Result<String, CheckoutError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CheckoutError::MissingField(field));
    }
    Ok(trimmed.to_owned())
}

/// Build the immutable line-item snapshot and order total.
///
/// Every cart entry must resolve against `products`; a missing product id
/// fails the whole build. Lines come out in ascending product-id order.
///
/// # Errors
///
/// Returns `CheckoutError::ProductNotFound` for the first unresolvable entry.
pub fn build_order_lines(
    cart: &Cart,
    products: &[Product],
) -> Result<(Vec<OrderLine>, Decimal), CheckoutError> {
    let by_id: HashMap<ProductId, &Product> = products.iter().map(|p| (p.id, p)).collect();

    let mut lines = Vec::new();
    let mut total = Decimal::ZERO;

    for (product_id, quantity) in cart.iter() {
        let product = by_id
            .get(&product_id)
            .ok_or(CheckoutError::ProductNotFound(product_id))?;
        let subtotal = product.price * Decimal::from(quantity);
        total += subtotal;
        lines.push(OrderLine {
            product_id,
            name: product.name.clone(),
            quantity,
            unit_price: product.price,
            subtotal,
        });
    }

    Ok((lines, total))
}

/// Order confirmation view model returned to the client.
#[derive(Debug, Clone, Serialize)]
pub struct OrderConfirmation {
    pub tracking_id: TrackingId,
    pub full_name: String,
    pub email: Email,
    pub address: String,
    pub total_price: Decimal,
    pub payment_method: String,
}

/// Run a full checkout against the database.
///
/// On success the customer has been upserted, the order committed, and a
/// confirmation returned. On any error nothing is committed and the cart is
/// left for the caller untouched.
///
/// # Errors
///
/// See [`CheckoutError`].
pub async fn process(
    pool: &PgPool,
    cart: &Cart,
    form: &CheckoutForm,
) -> Result<OrderConfirmation, CheckoutError> {
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let contact = form.validate()?;

    // Resolve by id only: a product that went out of stock still checks out
    // (stock gates cart adds, not order placement), but a deleted product is
    // fatal.
    let products = ProductRepository::new(pool)
        .get_by_ids(&cart.product_ids())
        .await?;
    let (lines, total_price) = build_order_lines(cart, &products)?;

    let tracking_id = TrackingId::generate();
    let (customer, order): (_, Order) = OrderRepository::new(pool)
        .place(NewOrder {
            full_name: &contact.full_name,
            email: &contact.email,
            address: &contact.address,
            payment_method: &contact.payment_method,
            lines,
            total_price,
            tracking_id,
        })
        .await?;

    tracing::info!(
        tracking_id = %order.tracking_id,
        total = %order.total_price,
        "order placed"
    );

    Ok(OrderConfirmation {
        tracking_id: order.tracking_id,
        full_name: customer.full_name,
        email: customer.email,
        address: customer.address,
        total_price: order.total_price,
        payment_method: contact.payment_method,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::services::pricing;

    fn form(name: &str, email: &str, address: &str, payment: &str) -> CheckoutForm {
        CheckoutForm {
            full_name: name.to_string(),
            email: email.to_string(),
            address: address.to_string(),
            payment_method: payment.to_string(),
        }
    }

    fn product(id: i32, price: &str) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            description: String::new(),
            price: price.parse().unwrap(),
            stock: 5,
            category: None,
            image_url: None,
        }
    }

    #[test]
    fn test_validate_accepts_and_trims() {
        let contact = form("  Ada Lovelace ", " ada@example.com ", " 1 Main St ", " cod ")
            .validate()
            .unwrap();
        assert_eq!(contact.full_name, "Ada Lovelace");
        assert_eq!(contact.email.as_str(), "ada@example.com");
        assert_eq!(contact.address, "1 Main St");
        assert_eq!(contact.payment_method, "cod");
    }

    #[test]
    fn test_validate_rejects_blank_fields() {
        let blank_name = form("   ", "a@b.c", "addr", "cod").validate();
        assert!(matches!(
            blank_name,
            Err(CheckoutError::MissingField("full_name"))
        ));

        let blank_payment = form("Ada", "a@b.c", "addr", "").validate();
        assert!(matches!(
            blank_payment,
            Err(CheckoutError::MissingField("payment_method"))
        ));
    }

    #[test]
    fn test_validate_rejects_bad_email() {
        let bad = form("Ada", "not-an-email", "addr", "cod").validate();
        assert!(matches!(bad, Err(CheckoutError::InvalidEmail(_))));
    }

    #[test]
    fn test_build_order_lines_snapshot() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(1), 2);
        cart.set_quantity(ProductId::new(2), 1);

        let catalog = [product(1, "10.00"), product(2, "5.00")];
        let (lines, total) = build_order_lines(&cart, &catalog).unwrap();

        assert_eq!(total, "25.00".parse::<Decimal>().unwrap());
        assert_eq!(
            lines,
            vec![
                OrderLine {
                    product_id: ProductId::new(1),
                    name: "product-1".to_string(),
                    quantity: 2,
                    unit_price: "10.00".parse().unwrap(),
                    subtotal: "20.00".parse().unwrap(),
                },
                OrderLine {
                    product_id: ProductId::new(2),
                    name: "product-2".to_string(),
                    quantity: 1,
                    unit_price: "5.00".parse().unwrap(),
                    subtotal: "5.00".parse().unwrap(),
                },
            ]
        );
    }

    #[test]
    fn test_missing_product_fails_whole_checkout() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(1), 1);
        cart.set_quantity(ProductId::new(99), 1);

        let result = build_order_lines(&cart, &[product(1, "10.00")]);
        assert!(matches!(
            result,
            Err(CheckoutError::ProductNotFound(id)) if id == ProductId::new(99)
        ));
    }

    #[test]
    fn test_checkout_total_matches_display_total() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(1), 3);
        cart.set_quantity(ProductId::new(2), 2);

        let catalog = [product(1, "19.99"), product(2, "0.01")];
        let (_, checkout_total) = build_order_lines(&cart, &catalog).unwrap();
        let display_total = pricing::snapshot(&cart, &catalog).total;

        assert_eq!(checkout_total, display_total);
        assert_eq!(checkout_total, "59.99".parse::<Decimal>().unwrap());
    }

    #[test]
    fn test_out_of_stock_product_still_prices() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(1), 1);

        let mut sold_out = product(1, "12.50");
        sold_out.stock = 0;

        // Stock gates cart adds, not order placement: an entry whose product
        // sold out after being added is charged, on the summary and on submit.
        let (lines, total) = build_order_lines(&cart, &[sold_out]).unwrap();
        assert_eq!(lines.len(), 1);
        assert_eq!(total, "12.50".parse::<Decimal>().unwrap());
    }
}
