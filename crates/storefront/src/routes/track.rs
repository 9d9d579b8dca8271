//! Order tracking lookup.

use axum::{Form, Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::models::Order;
use crate::state::AppState;

/// Track-order form submission.
#[derive(Debug, Deserialize)]
pub struct TrackOrderForm {
    #[serde(default)]
    pub tracking_id: String,
}

/// Look up an order by its tracking identifier.
///
/// A blank (after trimming) tracking id is a validation failure, which is
/// deliberately distinct from an unknown id's not-found.
#[instrument(skip(state, form))]
pub async fn track_order(
    State(state): State<AppState>,
    Form(form): Form<TrackOrderForm>,
) -> Result<Json<Order>> {
    let tracking_id = form.tracking_id.trim();
    if tracking_id.is_empty() {
        return Err(AppError::Validation("Please enter a tracking ID.".to_string()));
    }

    let order = OrderRepository::new(state.pool())
        .find_by_tracking_id(tracking_id)
        .await?
        .ok_or_else(|| {
            AppError::NotFound("Order not found with that tracking ID.".to_string())
        })?;

    Ok(Json(order))
}
