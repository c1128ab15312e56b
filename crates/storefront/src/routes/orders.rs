//! Order history handler.
//!
//! The storefront holds no accounts; the shopper's id comes from the
//! front-end's login state and the backend decides what that shopper may see.

use axum::{
    Json,
    extract::{Query, State},
};
use nordic_core::order::OrderSummary;
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrdersParams {
    pub user_id: Option<String>,
}

/// Past orders of one shopper, newest first as the backend orders them.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<OrdersParams>,
) -> Result<Json<Vec<OrderSummary>>> {
    let user_id = params
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| AppError::BadRequest("userId is required".to_string()))?;

    Ok(Json(state.backend().orders_for_user(user_id).await?))
}
