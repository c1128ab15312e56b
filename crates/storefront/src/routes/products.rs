//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use nordic_core::ProductRecord;
use nordic_core::catalog::{CatalogParams, CatalogQuery, Page};
use nordic_core::review::ReviewSummary;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Product listing: search, category and brand filters, sorting, pagination.
///
/// Query parameters follow the backend's listing API (`page` is zero-based,
/// `sortBy`/`sortDirection` or the combined `sort=price-desc`).
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(params): Query<CatalogParams>,
) -> Result<Json<Page<ProductRecord>>> {
    let products = state.backend().products().await?;
    let query = CatalogQuery::from(params);
    Ok(Json(query.execute(&products)))
}

/// A single product by id.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductRecord>> {
    state
        .backend()
        .product(&id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Best-selling products for the home page row.
#[instrument(skip(state))]
pub async fn best_selling(State(state): State<AppState>) -> Result<Json<Vec<ProductRecord>>> {
    let products = state.backend().best_selling().await?;
    Ok(Json(products.to_vec()))
}

/// Best-reviewed products for the home page row.
#[instrument(skip(state))]
pub async fn best_reviewed(State(state): State<AppState>) -> Result<Json<Vec<ProductRecord>>> {
    let products = state.backend().best_reviewed().await?;
    Ok(Json(products.to_vec()))
}

/// Reviews of a product with their count and mean rating.
#[instrument(skip(state))]
pub async fn reviews(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ReviewSummary>> {
    Ok(Json(state.backend().reviews(&id).await?))
}
