//! Checkout route handlers.
//!
//! `GET /checkout` prices the current cart for the confirmation page;
//! `POST /checkout` runs the orchestrator. Both resolve products by id and
//! build lines through the same rule, so the summary total and the committed
//! order total agree for an unchanged cart and catalog. An empty cart never
//! reaches the orchestrator: both handlers bounce it back to the cart view
//! with a warning, before anything touches storage.

use axum::{
    Form, Json,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::db::ProductRepository;
use crate::error::Result;
use crate::models::session::{FlashLevel, push_flash};
use crate::models::{Cart, OrderLine};
use crate::services::checkout::{self, CheckoutForm, OrderConfirmation};
use crate::state::AppState;

/// Pre-checkout view model: the priced cart a customer is about to buy.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub items: Vec<OrderLine>,
    pub total: rust_decimal::Decimal,
}

/// Successful checkout view model.
#[derive(Debug, Serialize)]
pub struct CheckoutSuccess {
    pub order_success: OrderConfirmation,
}

async fn reject_empty_cart(session: &Session) -> Result<Response> {
    push_flash(session, FlashLevel::Warning, "Your cart is empty!").await?;
    Ok(Redirect::to("/cart").into_response())
}

/// Show the checkout summary for the current cart.
///
/// Resolves by id without a stock gate, exactly as `submit` does: a product
/// that went out of stock after being added is still shown (and charged), a
/// deleted product is a 404 here just as it would be on submit.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Response> {
    let cart = Cart::load(&session).await;
    if cart.is_empty() {
        return reject_empty_cart(&session).await;
    }

    let products = ProductRepository::new(state.pool())
        .get_by_ids(&cart.product_ids())
        .await?;
    let (items, total) = checkout::build_order_lines(&cart, &products)?;

    Ok(Json(CheckoutView { items, total }).into_response())
}

/// Execute checkout: validate, persist atomically, clear the cart.
#[instrument(skip(state, session, form))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<CheckoutForm>,
) -> Result<Response> {
    let mut cart = Cart::load(&session).await;
    if cart.is_empty() {
        return reject_empty_cart(&session).await;
    }

    let confirmation = checkout::process(state.pool(), &cart, &form).await?;

    // Only a committed order empties the cart.
    cart.clear();
    cart.save(&session).await?;

    Ok(Json(CheckoutSuccess {
        order_success: confirmation,
    })
    .into_response())
}
