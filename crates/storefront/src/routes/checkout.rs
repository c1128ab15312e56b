//! Checkout and coupon route handlers.
//!
//! The payment session is created by the backend. The storefront validates
//! the address and coupon, forwards the cart and returns the payment URL.
//! The cart is cleared once a URL comes back.

use axum::{Json, extract::State};
use nordic_core::checkout::{
    CheckoutRequest, CouponCode, CouponValidation, ShippingAddress,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::backend::BackendError;
use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;
use crate::state::AppState;

/// Checkout form body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutForm {
    #[serde(default)]
    pub address: ShippingAddress,
    /// Previously applied coupon; blank means none.
    #[serde(default)]
    pub coupon_code: Option<String>,
}

/// Where to send the shopper to pay.
#[derive(Debug, Serialize)]
pub struct CheckoutResponse {
    pub url: String,
}

/// Coupon form body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponForm {
    #[serde(default)]
    pub coupon_code: String,
}

/// Discount a coupon gives on the current cart.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CouponResponse {
    pub coupon_code: CouponCode,
    #[serde(with = "rust_decimal::serde::float")]
    pub discount: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
}

/// Check a coupon against the cart subtotal.
#[instrument(skip(state, cart, form))]
pub async fn validate_coupon(
    State(state): State<AppState>,
    cart: SessionCart,
    Json(form): Json<CouponForm>,
) -> Result<Json<CouponResponse>> {
    let code = CouponCode::parse(&form.coupon_code)?;
    let subtotal = cart.total_price();
    let discount = apply_coupon(&state, &code, subtotal).await?;

    Ok(Json(CouponResponse {
        coupon_code: code,
        discount,
        total: (subtotal - discount).max(Decimal::ZERO),
    }))
}

/// Start a payment session for the cart.
#[instrument(skip(state, cart, form))]
pub async fn checkout(
    State(state): State<AppState>,
    mut cart: SessionCart,
    Json(form): Json<CheckoutForm>,
) -> Result<Json<CheckoutResponse>> {
    let coupon = form
        .coupon_code
        .as_deref()
        .filter(|code| !code.trim().is_empty())
        .map(CouponCode::parse)
        .transpose()?;

    let config = state.config();
    let request = CheckoutRequest::new(
        cart.cart(),
        form.address,
        config.checkout_success_url(),
        config.checkout_cancel_url(),
        coupon,
    )?;

    if let Some(code) = &request.coupon_code {
        apply_coupon(&state, code, cart.total_price()).await?;
    }

    let session = state.backend().create_checkout(&request).await?;
    let Some(url) = session.url else {
        return Err(BackendError::Parse("checkout session without url".to_string()).into());
    };

    cart.clear();
    cart.save().await;

    add_breadcrumb("checkout", "Payment session created", None);
    tracing::info!(lines = request.cart.len(), "checkout started");

    Ok(Json(CheckoutResponse { url }))
}

/// Ask the backend for the discount and reject coupons that give nothing.
async fn apply_coupon(state: &AppState, code: &CouponCode, subtotal: Decimal) -> Result<Decimal> {
    code.check_subtotal(subtotal)?;

    let discount = state
        .backend()
        .validate_coupon(&CouponValidation {
            coupon_code: code.clone(),
            order_subtotal: subtotal,
        })
        .await?;

    if discount <= Decimal::ZERO {
        return Err(AppError::BadRequest(
            "Coupon does not apply to this order".to_string(),
        ));
    }
    Ok(discount)
}
