//! Order repository: atomic order placement and tracking lookup.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use sqlx::types::Json;

use clover_market_core::{
    CustomerId, Email, OrderId, OrderStatus, PaymentStatus, TrackingId,
};

use super::RepositoryError;
use crate::models::{Customer, Order, OrderLine};

/// Everything needed to persist one checkout.
#[derive(Debug)]
pub struct NewOrder<'a> {
    pub full_name: &'a str,
    pub email: &'a Email,
    pub address: &'a str,
    pub payment_method: &'a str,
    pub lines: Vec<OrderLine>,
    pub total_price: Decimal,
    pub tracking_id: TrackingId,
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: CustomerId,
    full_name: String,
    email: Email,
    address: String,
    created_at: DateTime<Utc>,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Self {
            id: row.id,
            full_name: row.full_name,
            email: row.email,
            address: row.address,
            created_at: row.created_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: OrderId,
    customer_id: CustomerId,
    items: Json<Vec<OrderLine>>,
    total_price: Decimal,
    tracking_id: TrackingId,
    status: String,
    payment_status: String,
    payment_method: Option<String>,
    created_at: DateTime<Utc>,
    payment_date: Option<DateTime<Utc>>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let status: OrderStatus = row
            .status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;
        let payment_status: PaymentStatus = row
            .payment_status
            .parse()
            .map_err(RepositoryError::DataCorruption)?;

        Ok(Self {
            id: row.id,
            customer_id: row.customer_id,
            items: row.items.0,
            total_price: row.total_price,
            tracking_id: row.tracking_id,
            status,
            payment_status,
            payment_method: row.payment_method,
            created_at: row.created_at,
            payment_date: row.payment_date,
        })
    }
}

/// Repository for customer and order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Persist a checkout atomically: upsert the customer by email, then
    /// insert the order. Either both rows are committed or neither is.
    ///
    /// The upsert overwrites name and address on an existing customer; the
    /// email itself is the stable key and never changes here.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the tracking id collides with
    /// an existing order (not retried; see [`TrackingId`]).
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn place(&self, new_order: NewOrder<'_>) -> Result<(Customer, Order), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let customer_row = sqlx::query_as::<_, CustomerRow>(
            r"
            INSERT INTO shop.customer (full_name, email, address)
            VALUES ($1, $2, $3)
            ON CONFLICT (email) DO UPDATE
                SET full_name = EXCLUDED.full_name,
                    address = EXCLUDED.address
            RETURNING id, full_name, email, address, created_at
            ",
        )
        .bind(new_order.full_name)
        .bind(new_order.email)
        .bind(new_order.address)
        .fetch_one(&mut *tx)
        .await?;

        let order_row = sqlx::query_as::<_, OrderRow>(
            r"
            INSERT INTO shop.shop_order
                (customer_id, items, total_price, tracking_id, payment_method)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, customer_id, items, total_price, tracking_id,
                      status, payment_status, payment_method, created_at, payment_date
            ",
        )
        .bind(customer_row.id)
        .bind(Json(&new_order.lines))
        .bind(new_order.total_price)
        .bind(&new_order.tracking_id)
        .bind(new_order.payment_method)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("tracking id already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        tx.commit().await?;

        Ok((customer_row.into(), order_row.try_into()?))
    }

    /// Exact-match lookup by tracking identifier.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status is unknown.
    pub async fn find_by_tracking_id(
        &self,
        tracking_id: &str,
    ) -> Result<Option<Order>, RepositoryError> {
        let row = sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, customer_id, items, total_price, tracking_id,
                   status, payment_status, payment_method, created_at, payment_date
            FROM shop.shop_order
            WHERE tracking_id = $1
            ",
        )
        .bind(tracking_id)
        .fetch_optional(self.pool)
        .await?;

        row.map(Order::try_from).transpose()
    }
}
