//! Category and brand navigation handlers.

use axum::{Json, extract::State};
use nordic_core::taxonomy::{Brand, Category};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// All categories as `{id, name}`.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<Category>>> {
    Ok(Json(state.backend().categories().await?))
}

/// All brands as `{id, name}`.
#[instrument(skip(state))]
pub async fn brands(State(state): State<AppState>) -> Result<Json<Vec<Brand>>> {
    Ok(Json(state.backend().brands().await?))
}
