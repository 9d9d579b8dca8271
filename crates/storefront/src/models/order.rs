//! Customers and orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clover_market_core::{CustomerId, Email, OrderId, OrderStatus, PaymentStatus, ProductId, TrackingId};

/// A checkout contact, upserted by unique email.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub id: CustomerId,
    pub full_name: String,
    pub email: Email,
    pub address: String,
    pub created_at: DateTime<Utc>,
}

/// One line of an order's immutable item snapshot.
///
/// The JSON shape of this struct is a durable external contract: historical
/// orders are read back through it. Money fields serialize as JSON numbers,
/// not strings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: ProductId,
    pub name: String,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub unit_price: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
}

/// A placed order.
///
/// `items` is a snapshot captured at checkout time; later catalog edits never
/// change it. `tracking_id` is assigned once at creation.
#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: CustomerId,
    pub items: Vec<OrderLine>,
    pub total_price: Decimal,
    pub tracking_id: TrackingId,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub payment_method: Option<String>,
    pub created_at: DateTime<Utc>,
    pub payment_date: Option<DateTime<Utc>>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_line_json_contract() {
        let line = OrderLine {
            product_id: ProductId::new(3),
            name: "Honey".to_string(),
            quantity: 2,
            unit_price: Decimal::new(1000, 2),
            subtotal: Decimal::new(2000, 2),
        };

        let json = serde_json::to_value(&line).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "product_id": 3,
                "name": "Honey",
                "quantity": 2,
                "unit_price": 10.0,
                "subtotal": 20.0,
            })
        );
    }

    #[test]
    fn test_order_line_reads_historical_json() {
        // Shape written by earlier versions of the store must keep decoding.
        let line: OrderLine = serde_json::from_str(
            r#"{"product_id": 7, "name": "Jam", "quantity": 1, "unit_price": 4.5, "subtotal": 4.5}"#,
        )
        .unwrap();
        assert_eq!(line.product_id, ProductId::new(7));
        assert_eq!(line.unit_price, Decimal::new(45, 1));
    }
}
