//! Catalog route handlers: home, product listing, and search.
//!
//! All read-only. Responses carry the current cart quantities alongside the
//! products so a client can render "in cart" badges without a second call.

use std::collections::BTreeMap;

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::models::{Cart, Product};
use crate::state::AppState;

const UNCATEGORIZED: &str = "Uncategorized";

/// Products of one category.
#[derive(Debug, Serialize)]
pub struct CategoryGroup {
    pub category: String,
    pub products: Vec<Product>,
}

/// Catalog view model.
#[derive(Debug, Serialize)]
pub struct CatalogView {
    pub categories: Vec<CategoryGroup>,
    pub cart_quantities: Cart,
}

/// Search view model.
#[derive(Debug, Serialize)]
pub struct SearchView {
    pub query: String,
    pub products: Vec<Product>,
    pub cart_quantities: Cart,
}

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub query: Option<String>,
}

/// Group products by category name, in alphabetical category order.
fn group_by_category(products: Vec<Product>) -> Vec<CategoryGroup> {
    let mut grouped: BTreeMap<String, Vec<Product>> = BTreeMap::new();
    for product in products {
        let category = product
            .category
            .clone()
            .unwrap_or_else(|| UNCATEGORIZED.to_string());
        grouped.entry(category).or_default().push(product);
    }

    grouped
        .into_iter()
        .map(|(category, products)| CategoryGroup { category, products })
        .collect()
}

/// Home page: in-stock products grouped by category.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<Json<CatalogView>> {
    let products = ProductRepository::new(state.pool()).list_in_stock().await?;
    let cart_quantities = Cart::load(&session).await;

    Ok(Json(CatalogView {
        categories: group_by_category(products),
        cart_quantities,
    }))
}

/// Full catalog, including out-of-stock products.
#[instrument(skip(state, session))]
pub async fn products(
    State(state): State<AppState>,
    session: Session,
) -> Result<Json<CatalogView>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    let cart_quantities = Cart::load(&session).await;

    Ok(Json(CatalogView {
        categories: group_by_category(products),
        cart_quantities,
    }))
}

/// Case-insensitive product name search. A blank query matches nothing.
#[instrument(skip(state, session))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<SearchQuery>,
) -> Result<Json<SearchView>> {
    let query = params.query.unwrap_or_default().trim().to_owned();

    let products = if query.is_empty() {
        Vec::new()
    } else {
        ProductRepository::new(state.pool()).search(&query).await?
    };
    let cart_quantities = Cart::load(&session).await;

    Ok(Json(SearchView {
        query,
        products,
        cart_quantities,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clover_market_core::ProductId;
    use rust_decimal::Decimal;

    fn product(id: i32, category: Option<&str>) -> Product {
        Product {
            id: ProductId::new(id),
            name: format!("product-{id}"),
            description: String::new(),
            price: Decimal::ONE,
            stock: 1,
            category: category.map(String::from),
            image_url: None,
        }
    }

    #[test]
    fn test_group_by_category() {
        let groups = group_by_category(vec![
            product(1, Some("Tea")),
            product(2, None),
            product(3, Some("Tea")),
            product(4, Some("Bread")),
        ]);

        let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(names, vec!["Bread", "Tea", "Uncategorized"]);

        let tea = groups.iter().find(|g| g.category == "Tea").unwrap();
        assert_eq!(tea.products.len(), 2);
    }

    #[test]
    fn test_group_by_category_empty() {
        assert!(group_by_category(Vec::new()).is_empty());
    }
}
