//! Client for the external storefront backend.
//!
//! # Architecture
//!
//! - The backend is the source of truth for products, coupons, and payments
//! - Product lists are fetched whole and cached in memory via `moka`; listing
//!   pages are computed locally with [`nordic_core::catalog`]
//! - Checkout sessions are created by the backend, which talks to the payment
//!   provider; this client only forwards the request
//!
//! # Endpoints
//!
//! ```text
//! GET  {api}/products                  - Full product list (array or paginated object)
//! GET  {api}/products/best-selling     - Top sellers
//! GET  {api}/products/best-reviewed    - Highest rated
//! GET  {api}/categories                - Category list
//! GET  {api}/brands                    - Brand list
//! GET  {api}/reviews/product/{id}      - Reviews of one product
//! GET  {api}/orders/by-user?userId=... - A shopper's order history
//! POST {api}/coupons/validate          - Discount for a coupon and subtotal
//! POST {api}/stripe/checkout           - Create a payment session
//! ```

use std::sync::Arc;

use moka::future::Cache;
use nordic_core::checkout::{CheckoutRequest, CheckoutSession, CouponValidation};
use nordic_core::order::OrderSummary;
use nordic_core::review::ReviewSummary;
use nordic_core::taxonomy::{Brand, Category};
use nordic_core::{ProductRecord, coerce_price};
use rust_decimal::Decimal;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::BackendConfig;

/// Cached product lists, keyed by backend path.
const PRODUCTS_CACHE_KEY: &str = "products";
const BEST_SELLING_CACHE_KEY: &str = "products/best-selling";
const BEST_REVIEWED_CACHE_KEY: &str = "products/best-reviewed";

/// Errors that can occur when calling the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    /// The response body had an unexpected shape.
    #[error("unexpected response: {0}")]
    Parse(String),

    /// A request URL could not be built.
    #[error("invalid backend URL: {0}")]
    Url(#[from] url::ParseError),
}

impl BackendError {
    /// Whether the backend rejected the request because of its content
    /// (as opposed to being down or broken).
    #[must_use]
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::Status { status, .. } if status.is_client_error())
    }
}

/// Client for the backend REST API.
///
/// Cheaply cloneable; clones share the connection pool and the cache.
#[derive(Clone)]
pub struct BackendClient {
    inner: Arc<BackendClientInner>,
}

struct BackendClientInner {
    client: reqwest::Client,
    api_url: String,
    products: Cache<&'static str, Arc<Vec<ProductRecord>>>,
}

impl BackendClient {
    /// Create a new backend client.
    #[must_use]
    pub fn new(config: &BackendConfig) -> Self {
        let products = Cache::builder()
            .max_capacity(3)
            .time_to_live(config.catalog_cache_ttl)
            .build();

        Self {
            inner: Arc::new(BackendClientInner {
                client: reqwest::Client::new(),
                api_url: config.api_url.trim_end_matches('/').to_string(),
                products,
            }),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.inner.api_url)
    }

    /// Endpoint URL with each segment percent-encoded.
    fn endpoint_url(&self, segments: &[&str]) -> Result<Url, BackendError> {
        let mut url = Url::parse(&self.inner.api_url)?;
        url.path_segments_mut()
            .map_err(|()| BackendError::Url(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// All products, served from cache when fresh.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or answers with an
    /// unexpected payload.
    #[instrument(skip(self))]
    pub async fn products(&self) -> Result<Arc<Vec<ProductRecord>>, BackendError> {
        self.cached_products(PRODUCTS_CACHE_KEY).await
    }

    /// Best-selling products in the backend's order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::products`].
    #[instrument(skip(self))]
    pub async fn best_selling(&self) -> Result<Arc<Vec<ProductRecord>>, BackendError> {
        self.cached_products(BEST_SELLING_CACHE_KEY).await
    }

    /// Best-reviewed products in the backend's order.
    ///
    /// # Errors
    ///
    /// Same as [`Self::products`].
    #[instrument(skip(self))]
    pub async fn best_reviewed(&self) -> Result<Arc<Vec<ProductRecord>>, BackendError> {
        self.cached_products(BEST_REVIEWED_CACHE_KEY).await
    }

    async fn cached_products(
        &self,
        path: &'static str,
    ) -> Result<Arc<Vec<ProductRecord>>, BackendError> {
        if let Some(cached) = self.inner.products.get(path).await {
            debug!(path, "product list cache hit");
            return Ok(cached);
        }

        let body = self.get_json(&self.endpoint(path)).await?;
        let products = Arc::new(parse_product_list(body)?);
        debug!(path, count = products.len(), "product list fetched");

        self.inner.products.insert(path, Arc::clone(&products)).await;
        Ok(products)
    }

    /// All categories.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or does not answer
    /// with a list.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, BackendError> {
        let body = self.get_json(&self.endpoint("categories")).await?;
        Ok(parse_list(body, "category")?.iter().map(Category::from_json).collect())
    }

    /// All brands.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or does not answer
    /// with a list.
    #[instrument(skip(self))]
    pub async fn brands(&self) -> Result<Vec<Brand>, BackendError> {
        let body = self.get_json(&self.endpoint("brands")).await?;
        Ok(parse_list(body, "brand")?.iter().map(Brand::from_json).collect())
    }

    /// Reviews of one product with their mean rating.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable or does not answer
    /// with a list.
    #[instrument(skip(self))]
    pub async fn reviews(&self, product_id: &str) -> Result<ReviewSummary, BackendError> {
        let url = self.endpoint_url(&["reviews", "product", product_id])?;
        let body = self.get_json(url.as_str()).await?;
        Ok(ReviewSummary::new(parse_list(body, "review")?))
    }

    /// Order history of one shopper, as the backend returns it.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend is unreachable, refuses the request,
    /// or does not answer with a list.
    #[instrument(skip(self))]
    pub async fn orders_for_user(&self, user_id: &str) -> Result<Vec<OrderSummary>, BackendError> {
        let mut url = self.endpoint_url(&["orders", "by-user"])?;
        url.query_pairs_mut().append_pair("userId", user_id);
        let body = self.get_json(url.as_str()).await?;
        Ok(parse_list(body, "order")?.iter().map(OrderSummary::from_json).collect())
    }

    /// Look up a single product by its canonical id.
    ///
    /// # Errors
    ///
    /// Returns an error if the product list cannot be fetched.
    pub async fn product(&self, id: &str) -> Result<Option<ProductRecord>, BackendError> {
        let products = self.products().await?;
        Ok(products
            .iter()
            .find(|p| p.id().is_some_and(|pid| pid.as_str() == id))
            .cloned())
    }

    /// Ask the backend how much a coupon takes off `subtotal`.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Status`] when the backend rejects the coupon.
    #[instrument(skip(self, body), fields(coupon = %body.coupon_code.as_str()))]
    pub async fn validate_coupon(&self, body: &CouponValidation) -> Result<Decimal, BackendError> {
        let value = self
            .post_json(&self.endpoint("coupons/validate"), body)
            .await?;
        Ok(coerce_price(&value))
    }

    /// Create a payment session for the cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend refuses the checkout or is unreachable.
    #[instrument(skip(self, request), fields(lines = request.cart.len()))]
    pub async fn create_checkout(
        &self,
        request: &CheckoutRequest,
    ) -> Result<CheckoutSession, BackendError> {
        let value = self
            .post_json(&self.endpoint("stripe/checkout"), request)
            .await?;
        serde_json::from_value(value).map_err(|e| BackendError::Parse(e.to_string()))
    }

    async fn get_json(&self, url: &str) -> Result<Value, BackendError> {
        let response = self.inner.client.get(url).send().await?;
        read_json(response).await
    }

    async fn post_json<B: serde::Serialize + ?Sized>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<Value, BackendError> {
        let response = self.inner.client.post(url).json(body).send().await?;
        read_json(response).await
    }
}

async fn read_json(response: reqwest::Response) -> Result<Value, BackendError> {
    let status = response.status();
    let text = response.text().await?;

    if !status.is_success() {
        tracing::warn!(
            status = %status,
            body = %text.chars().take(500).collect::<String>(),
            "backend returned non-success status"
        );
        return Err(BackendError::Status {
            status,
            message: error_message(&text),
        });
    }

    serde_json::from_str(&text).map_err(|e| BackendError::Parse(e.to_string()))
}

/// Extract a human-readable message from an error body.
///
/// The backend answers with `{"message": ...}`, `{"error": ...}`, a bare JSON
/// string, or plain text depending on the endpoint.
fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| match value {
        Value::String(s) => Some(s),
        Value::Object(map) => ["message", "error"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str).map(str::to_owned)),
        _ => None,
    });

    from_json
        .or_else(|| {
            let trimmed = body.trim();
            (!trimmed.is_empty()).then(|| trimmed.chars().take(200).collect())
        })
        .unwrap_or_else(|| "Request failed".to_string())
}

/// Accept either a bare array or a paginated `{ "content": [...] }` object.
fn parse_list(body: Value, what: &str) -> Result<Vec<Value>, BackendError> {
    match body {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove("content") {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(BackendError::Parse(format!("{what} page without content"))),
        },
        other => Err(BackendError::Parse(format!(
            "expected {what} list, got {}",
            json_kind(&other)
        ))),
    }
}

fn parse_product_list(body: Value) -> Result<Vec<ProductRecord>, BackendError> {
    Ok(parse_list(body, "product")?
        .into_iter()
        .map(ProductRecord::from)
        .collect())
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_parse_bare_array() {
        let products = parse_product_list(json!([{"id": 1}, {"productId": "2"}])).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[1].id().unwrap().as_str(), "2");
    }

    #[test]
    fn test_parse_paginated_object() {
        let products =
            parse_product_list(json!({"content": [{"id": 1}], "totalPages": 1})).unwrap();
        assert_eq!(products.len(), 1);
    }

    #[test]
    fn test_parse_rejects_other_shapes() {
        assert!(matches!(
            parse_product_list(json!({"items": []})),
            Err(BackendError::Parse(_))
        ));
        assert!(matches!(
            parse_product_list(json!("nope")),
            Err(BackendError::Parse(_))
        ));
    }

    #[test]
    fn test_error_message_shapes() {
        assert_eq!(error_message(r#"{"message": "Product not found"}"#), "Product not found");
        assert_eq!(error_message(r#"{"error": "Invalid coupon"}"#), "Invalid coupon");
        assert_eq!(error_message(r#""Coupon expired""#), "Coupon expired");
        assert_eq!(error_message("Bad Gateway"), "Bad Gateway");
        assert_eq!(error_message(""), "Request failed");
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = BackendClient::new(&BackendConfig {
            api_url: "http://backend.test/api/".to_string(),
            ..BackendConfig::default()
        });
        assert_eq!(
            client.endpoint("stripe/checkout"),
            "http://backend.test/api/stripe/checkout"
        );
    }

    #[test]
    fn test_endpoint_url_encodes_segments() {
        let client = BackendClient::new(&BackendConfig {
            api_url: "http://backend.test/api/postgresql".to_string(),
            ..BackendConfig::default()
        });
        let url = client.endpoint_url(&["reviews", "product", "a b/c"]).unwrap();
        assert_eq!(url.as_str(), "http://backend.test/api/postgresql/reviews/product/a%20b%2Fc");

        let mut url = client.endpoint_url(&["orders", "by-user"]).unwrap();
        url.query_pairs_mut().append_pair("userId", "u&1");
        assert_eq!(
            url.as_str(),
            "http://backend.test/api/postgresql/orders/by-user?userId=u%261"
        );
    }

    #[test]
    fn test_parse_list_names_the_kind() {
        let err = parse_list(json!({"items": []}), "order").unwrap_err();
        assert_eq!(err.to_string(), "unexpected response: order page without content");
        assert_eq!(parse_list(json!({"content": [1, 2]}), "brand").unwrap().len(), 2);
    }

    #[test]
    fn test_client_error_classification() {
        let err = BackendError::Status {
            status: reqwest::StatusCode::BAD_REQUEST,
            message: "bad".to_string(),
        };
        assert!(err.is_client_error());

        let err = BackendError::Status {
            status: reqwest::StatusCode::BAD_GATEWAY,
            message: "down".to_string(),
        };
        assert!(!err.is_client_error());
    }
}
