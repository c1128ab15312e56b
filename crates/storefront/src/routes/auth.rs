//! Logout handler.
//!
//! The storefront has no accounts of its own; logging out empties the cart
//! and ends the session.

use axum::http::StatusCode;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;

/// Clear the cart and destroy the session.
#[instrument(skip(cart))]
pub async fn logout(mut cart: SessionCart) -> Result<StatusCode> {
    cart.clear();

    cart.session()
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("failed to end session: {e}")))?;

    add_breadcrumb("auth", "Logged out", None);
    Ok(StatusCode::NO_CONTENT)
}
