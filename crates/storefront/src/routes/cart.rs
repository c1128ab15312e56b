//! Cart route handlers.
//!
//! Every handler loads the visitor's cart from the session through
//! [`SessionCart`], applies one operation, writes the cart back and answers
//! with the updated [`CartView`].

use axum::{Json, extract::Path, http::StatusCode};
use nordic_core::{CartLineItem, CartManager, ProductRecord, format_price};
use nordic_core::store::KeyValueStore;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::middleware::SessionCart;

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub id: String,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    pub quantity: u32,
    #[serde(with = "rust_decimal::serde::float")]
    pub subtotal: Decimal,
    pub formatted_price: String,
    pub formatted_subtotal: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total_items: u64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_price: Decimal,
    pub formatted_total: String,
}

impl From<&CartLineItem> for CartItemView {
    fn from(line: &CartLineItem) -> Self {
        let subtotal = line.subtotal();
        Self {
            id: line.id.to_string(),
            name: line.name.clone(),
            price: line.price,
            quantity: line.quantity,
            subtotal,
            formatted_price: format_price(line.price),
            formatted_subtotal: format_price(subtotal),
        }
    }
}

impl<S: KeyValueStore> From<&CartManager<S>> for CartView {
    fn from(manager: &CartManager<S>) -> Self {
        let total_price = manager.total_price();
        Self {
            items: manager.cart().items().iter().map(CartItemView::from).collect(),
            total_items: manager.total_items(),
            total_price,
            formatted_total: format_price(total_price),
        }
    }
}

/// Quantity adjustment body.
#[derive(Debug, Deserialize)]
pub struct QuantityChange {
    pub delta: i64,
}

/// Cart badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u64,
}

/// Current cart contents.
#[instrument(skip(cart))]
pub async fn show(cart: SessionCart) -> Json<CartView> {
    Json(CartView::from(&*cart))
}

/// Add one unit of a product.
///
/// The body is the product record as the backend returns it; id, name and
/// price are resolved from their aliases.
#[instrument(skip(cart, product))]
pub async fn add(
    mut cart: SessionCart,
    Json(product): Json<Value>,
) -> Result<(StatusCode, Json<CartView>)> {
    if !product.is_object() {
        return Err(AppError::BadRequest(
            "Product must be a JSON object".to_string(),
        ));
    }

    let id = cart.add_item(&ProductRecord::from(product));
    cart.save().await;

    add_breadcrumb("cart", "Added product", Some(&[("product_id", id.as_str())]));
    tracing::debug!(product_id = %id, "product added to cart");

    Ok((StatusCode::CREATED, Json(CartView::from(&*cart))))
}

/// Change a line's quantity by `delta`. Unknown ids are ignored.
#[instrument(skip(cart, change), fields(delta = change.delta))]
pub async fn change_quantity(
    mut cart: SessionCart,
    Path(id): Path<String>,
    Json(change): Json<QuantityChange>,
) -> Json<CartView> {
    cart.change_quantity(&id, change.delta);
    cart.save().await;
    Json(CartView::from(&*cart))
}

/// Remove a line item. Unknown ids are ignored.
#[instrument(skip(cart))]
pub async fn remove(mut cart: SessionCart, Path(id): Path<String>) -> Json<CartView> {
    cart.remove_item(&id);
    cart.save().await;

    add_breadcrumb("cart", "Removed product", Some(&[("product_id", id.as_str())]));
    Json(CartView::from(&*cart))
}

/// Empty the cart.
#[instrument(skip(cart))]
pub async fn clear(mut cart: SessionCart) -> Json<CartView> {
    cart.clear();
    cart.save().await;
    Json(CartView::from(&*cart))
}

/// Total number of units, for the header badge.
#[instrument(skip(cart))]
pub async fn count(cart: SessionCart) -> Json<CartCount> {
    Json(CartCount {
        count: cart.total_items(),
    })
}
