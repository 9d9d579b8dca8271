//! Product repository for catalog reads.
//!
//! The storefront never writes to the catalog; stocking is an admin concern.
//! All queries are runtime-checked `query_as` calls against the `shop` schema.

use sqlx::PgPool;

use clover_market_core::ProductId;

use super::RepositoryError;
use crate::models::Product;

const PRODUCT_COLUMNS: &str = r"
    SELECT p.id, p.name, p.description, p.price, p.stock, c.name AS category, p.image_url
    FROM shop.product p
    LEFT JOIN shop.category c ON c.id = p.category_id
";

/// Repository for catalog database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every product in the catalog, including out-of-stock ones.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!("{PRODUCT_COLUMNS} ORDER BY p.id"))
            .fetch_all(self.pool)
            .await?;
        Ok(products)
    }

    /// Products currently in stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_in_stock(&self) -> Result<Vec<Product>, RepositoryError> {
        let products =
            sqlx::query_as::<_, Product>(&format!("{PRODUCT_COLUMNS} WHERE p.stock > 0 ORDER BY p.id"))
                .fetch_all(self.pool)
                .await?;
        Ok(products)
    }

    /// Case-insensitive name substring search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search(&self, query: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", query.replace('%', "\\%").replace('_', "\\_"));
        let products =
            sqlx::query_as::<_, Product>(&format!("{PRODUCT_COLUMNS} WHERE p.name ILIKE $1 ORDER BY p.id"))
                .bind(pattern)
                .fetch_all(self.pool)
                .await?;
        Ok(products)
    }

    /// A single product, only if it is in stock.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_available(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product =
            sqlx::query_as::<_, Product>(&format!("{PRODUCT_COLUMNS} WHERE p.id = $1 AND p.stock > 0"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(product)
    }

    /// All listed products among `ids`, in-stock or not.
    ///
    /// Checkout uses this: a cart entry whose product has vanished must be
    /// detected, not silently dropped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let products =
            sqlx::query_as::<_, Product>(&format!("{PRODUCT_COLUMNS} WHERE p.id = ANY($1) ORDER BY p.id"))
                .bind(raw)
                .fetch_all(self.pool)
                .await?;
        Ok(products)
    }

    /// In-stock products among `ids`, for pricing the cart view.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_available_by_ids(
        &self,
        ids: &[ProductId],
    ) -> Result<Vec<Product>, RepositoryError> {
        let raw: Vec<i32> = ids.iter().map(|id| id.as_i32()).collect();
        let products = sqlx::query_as::<_, Product>(&format!(
            "{PRODUCT_COLUMNS} WHERE p.id = ANY($1) AND p.stock > 0 ORDER BY p.id"
        ))
        .bind(raw)
        .fetch_all(self.pool)
        .await?;
        Ok(products)
    }
}
