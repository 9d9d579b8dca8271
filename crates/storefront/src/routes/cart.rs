//! Cart route handlers.
//!
//! `GET /cart` doubles as the mutation endpoint via `?add=` / `?remove=`
//! query parameters (mutate, flash a message, redirect back), and as the
//! priced cart view when called bare. Bulk quantity updates arrive as an
//! explicit list of `{product_id, quantity}` pairs on `POST /cart/update`.

use axum::{
    Json,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_sessions::Session;
use tracing::instrument;

use clover_market_core::ProductId;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::models::session::{FlashLevel, push_flash, take_flashes};
use crate::models::{Cart, Flash};
use crate::services::pricing::{self, CartLine};
use crate::state::AppState;

/// Cart mutation query parameters.
#[derive(Debug, Deserialize)]
pub struct CartQuery {
    pub add: Option<i32>,
    pub remove: Option<i32>,
}

/// One entry of a bulk quantity update.
///
/// Both fields are raw JSON values on purpose: a malformed id or quantity
/// skips that entry, it never fails the batch.
#[derive(Debug, Deserialize)]
pub struct QuantityUpdate {
    pub product_id: Value,
    pub quantity: Value,
}

/// Bulk quantity update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub items: Vec<QuantityUpdate>,
}

/// Cart view model.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub total: rust_decimal::Decimal,
    pub messages: Vec<Flash>,
}

/// Leniently read a product id out of a JSON value.
fn parse_id(value: &Value) -> Option<ProductId> {
    parse_int(value).and_then(|id| i32::try_from(id).ok().map(ProductId::new))
}

/// Leniently read an integer quantity out of a JSON value.
///
/// Accepts integers and numeric strings; anything else (floats, "abc", null)
/// is malformed.
fn parse_quantity(value: &Value) -> Option<i64> {
    parse_int(value)
}

fn parse_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Apply a batch of quantity updates, skipping malformed entries.
fn apply_updates(cart: &mut Cart, updates: &[QuantityUpdate]) {
    for update in updates {
        let (Some(product_id), Some(quantity)) =
            (parse_id(&update.product_id), parse_quantity(&update.quantity))
        else {
            continue;
        };
        cart.set_quantity(product_id, quantity);
    }
}

/// Cart page: mutate via `?add`/`?remove`, or show the priced snapshot.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Query(params): Query<CartQuery>,
) -> Result<Response> {
    let mut cart = Cart::load(&session).await;

    if let Some(add_id) = params.add {
        let product_id = ProductId::new(add_id);
        match ProductRepository::new(state.pool())
            .get_available(product_id)
            .await?
        {
            Some(product) => {
                cart.add(product_id);
                cart.save(&session).await?;
                push_flash(
                    &session,
                    FlashLevel::Success,
                    format!("Added {} to cart.", product.name),
                )
                .await?;
            }
            None => {
                push_flash(
                    &session,
                    FlashLevel::Error,
                    "Product not found or out of stock.",
                )
                .await?;
            }
        }
        return Ok(Redirect::to("/cart").into_response());
    }

    if let Some(remove_id) = params.remove {
        cart.remove_one(ProductId::new(remove_id));
        cart.save(&session).await?;
        push_flash(&session, FlashLevel::Info, "Updated your cart.").await?;
        return Ok(Redirect::to("/cart").into_response());
    }

    let available = ProductRepository::new(state.pool())
        .get_available_by_ids(&cart.product_ids())
        .await?;
    let snapshot = pricing::snapshot(&cart, &available);
    let messages = take_flashes(&session).await;

    Ok(Json(CartView {
        items: snapshot.lines,
        total: snapshot.total,
        messages,
    })
    .into_response())
}

/// Bulk set-quantities, then redirect to the cart view.
#[instrument(skip(session, request))]
pub async fn update(
    session: Session,
    Json(request): Json<UpdateCartRequest>,
) -> Result<Redirect> {
    let mut cart = Cart::load(&session).await;
    apply_updates(&mut cart, &request.items);
    cart.save(&session).await?;
    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn entry(id: Value, quantity: Value) -> QuantityUpdate {
        QuantityUpdate {
            product_id: id,
            quantity,
        }
    }

    #[test]
    fn test_parse_quantity_accepts_ints_and_numeric_strings() {
        assert_eq!(parse_quantity(&json!(3)), Some(3));
        assert_eq!(parse_quantity(&json!("4")), Some(4));
        assert_eq!(parse_quantity(&json!(" 5 ")), Some(5));
        assert_eq!(parse_quantity(&json!(-1)), Some(-1));
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        assert_eq!(parse_quantity(&json!("abc")), None);
        assert_eq!(parse_quantity(&json!(2.5)), None);
        assert_eq!(parse_quantity(&json!(null)), None);
        assert_eq!(parse_quantity(&json!([1])), None);
    }

    #[test]
    fn test_apply_updates_sets_and_removes() {
        let mut cart = Cart::default();
        apply_updates(
            &mut cart,
            &[
                entry(json!(1), json!(2)),
                entry(json!(2), json!("3")),
            ],
        );
        assert_eq!(cart.quantity(ProductId::new(1)), Some(2));
        assert_eq!(cart.quantity(ProductId::new(2)), Some(3));

        apply_updates(&mut cart, &[entry(json!(1), json!(0))]);
        assert_eq!(cart.quantity(ProductId::new(1)), None);

        apply_updates(&mut cart, &[entry(json!(2), json!(-4))]);
        assert_eq!(cart.quantity(ProductId::new(2)), None);
    }

    #[test]
    fn test_apply_updates_skips_malformed_entries() {
        let mut cart = Cart::default();
        cart.set_quantity(ProductId::new(1), 5);

        apply_updates(
            &mut cart,
            &[
                // malformed quantity: entry skipped, cart unchanged for pid 1
                entry(json!(1), json!("abc")),
                // malformed id: skipped
                entry(json!("x"), json!(2)),
                // valid entry in the same batch still applies
                entry(json!(2), json!(7)),
            ],
        );

        assert_eq!(cart.quantity(ProductId::new(1)), Some(5));
        assert_eq!(cart.quantity(ProductId::new(2)), Some(7));
    }
}
