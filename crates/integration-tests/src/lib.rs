//! Integration tests for Nordic Electronics.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p nordic-integration-tests
//! ```
//!
//! No database or network services are needed. The storefront router runs
//! in-process with an in-memory session store, and the backend REST API is
//! replaced by [`MockBackend`], a small axum server on a loopback port.
//!
//! # Test Categories
//!
//! - `cart_api` - Session carts across requests
//! - `catalog_api` - Product listing and lookup, categories, brands, reviews
//! - `checkout_api` - Address, coupon and payment hand-off
//! - `orders_api` - Order history

#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Json, Router,
    body::Body,
    extract::{Path, Query, State},
    http::{HeaderValue, Method, Request, StatusCode, header},
    routing::{get, post},
};
use nordic_storefront::AppState;
use nordic_storefront::config::{BackendConfig, StorefrontConfig};
use nordic_storefront::middleware::configure_session_layer;
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;

/// Coupon code the mock backend accepts.
pub const VALID_COUPON: &str = "SAVE5";

/// Payment URL the mock backend hands out.
pub const PAYMENT_URL: &str = "https://pay.test/session/1";

/// Products served by the mock backend, one per alias family.
#[must_use]
pub fn sample_products() -> Value {
    json!([
        {
            "id": "p1",
            "name": "Widget",
            "price": "19.99",
            "description": "A small widget",
            "category": {"id": "c1"},
            "brand": {"id": "b1"},
        },
        {
            "productId": 2,
            "title": "Headphones",
            "listPrice": 129,
            "description": "Over-ear, wireless",
            "categoryId": "c2",
        },
        {
            "sku": "A-1",
            "productName": "Cable",
            "product_price": "4.50",
            "category": {"id": "c2"},
        },
    ])
}

/// Shopper with an order history on the mock backend.
pub const KNOWN_USER: &str = "u-1";

/// Categories served by the mock backend.
#[must_use]
pub fn sample_categories() -> Value {
    json!([
        {"categoryId": "c1", "name": "Gadgets"},
        {"id": "c2", "name": "Audio"},
        {"id": 3},
    ])
}

/// Brands served by the mock backend, as a paginated page.
#[must_use]
pub fn sample_brands() -> Value {
    json!({
        "content": [{"brandId": "b1", "name": "Nordisk"}, {"id": "b2", "name": ""}],
        "totalElements": 2,
    })
}

/// Order history of [`KNOWN_USER`].
#[must_use]
pub fn sample_orders() -> Value {
    json!([
        {
            "orderId": "o-1",
            "orderDate": "2025-03-01T10:00:00",
            "status": "PENDING",
            "orderProducts": [
                {"product": {"name": "Widget"}, "quantity": 2, "unitPrice": "19.99"},
            ],
        },
        {
            "id": "o-2",
            "status": "DELIVERED",
            "totalAmount": 129,
            "cart": [{"name": "Headphones", "price": 129, "quantity": 1}],
        },
    ])
}

/// Stand-in for the backend REST API.
pub struct MockBackend {
    pub url: String,
    checkouts: Arc<Mutex<Vec<Value>>>,
}

impl MockBackend {
    /// Serve the mock API on an ephemeral loopback port.
    pub async fn start() -> Self {
        let checkouts = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route("/products", get(|| async { Json(sample_products()) }))
            .route("/products/best-selling", get(best_selling))
            .route("/products/best-reviewed", get(best_reviewed))
            .route("/categories", get(|| async { Json(sample_categories()) }))
            .route("/brands", get(|| async { Json(sample_brands()) }))
            .route("/reviews/product/{id}", get(reviews))
            .route("/orders/by-user", get(orders_by_user))
            .route("/coupons/validate", post(validate_coupon))
            .route("/stripe/checkout", post(create_checkout))
            .with_state(Arc::clone(&checkouts));

        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{addr}"),
            checkouts,
        }
    }

    /// Checkout bodies received so far.
    #[must_use]
    pub fn checkouts(&self) -> Vec<Value> {
        self.checkouts.lock().unwrap().clone()
    }
}

async fn best_selling() -> Json<Value> {
    let mut products = sample_products();
    if let Some(list) = products.as_array_mut() {
        list.reverse();
    }
    Json(products)
}

async fn best_reviewed() -> Json<Value> {
    Json(json!({"content": [sample_products()[1].clone()], "totalPages": 1}))
}

async fn reviews(Path(id): Path<String>) -> Json<Value> {
    if id == "p1" {
        Json(json!([
            {"reviewId": "r1", "reviewValue": 5, "title": "Great"},
            {"reviewId": "r2", "reviewValue": 4, "comment": "Solid"},
        ]))
    } else {
        Json(json!([]))
    }
}

async fn orders_by_user(Query(params): Query<HashMap<String, String>>) -> (StatusCode, Json<Value>) {
    match params.get("userId").map(String::as_str) {
        Some(KNOWN_USER) => (StatusCode::OK, Json(sample_orders())),
        Some(_) => (StatusCode::OK, Json(json!([]))),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "userId is required"})),
        ),
    }
}

async fn validate_coupon(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    if body["couponCode"] == VALID_COUPON {
        (StatusCode::OK, Json(json!(5)))
    } else {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"message": "Invalid coupon code"})),
        )
    }
}

async fn create_checkout(
    State(checkouts): State<Arc<Mutex<Vec<Value>>>>,
    Json(body): Json<Value>,
) -> Json<Value> {
    checkouts.lock().unwrap().push(body);
    Json(json!({"url": PAYMENT_URL}))
}

/// Storefront configuration pointing at `backend_url`.
#[must_use]
pub fn test_config(backend_url: &str) -> StorefrontConfig {
    StorefrontConfig {
        database_url: SecretString::from("postgres://unused"),
        host: IpAddr::from([127, 0, 0, 1]),
        port: 0,
        base_url: "http://shop.test".to_string(),
        backend: BackendConfig {
            api_url: backend_url.to_string(),
            catalog_cache_ttl: Duration::from_secs(60),
        },
        sentry_dsn: None,
        sentry_environment: None,
    }
}

/// Response status, headers and parsed body.
pub struct TestResponse {
    pub status: StatusCode,
    pub request_id: Option<HeaderValue>,
    pub body: Value,
}

/// One visitor talking to an in-process storefront.
///
/// The session cookie from each response is sent with the next request, the
/// way a browser would.
#[derive(Clone)]
pub struct TestClient {
    router: Router,
    cookie: Option<String>,
}

impl TestClient {
    /// A fresh visitor on a fresh storefront.
    #[must_use]
    pub fn new(backend_url: &str) -> Self {
        let state = AppState::new(test_config(backend_url));
        let sessions = configure_session_layer(tower_sessions::MemoryStore::default(), false);

        Self {
            router: nordic_storefront::app(state, sessions),
            cookie: None,
        }
    }

    /// Another visitor on the same storefront, without a session.
    #[must_use]
    pub fn new_visitor(&self) -> Self {
        Self {
            router: self.router.clone(),
            cookie: None,
        }
    }

    pub async fn get(&mut self, uri: &str) -> TestResponse {
        self.send(Method::GET, uri, None).await
    }

    pub async fn post(&mut self, uri: &str, body: Value) -> TestResponse {
        self.send(Method::POST, uri, Some(body)).await
    }

    pub async fn delete(&mut self, uri: &str) -> TestResponse {
        self.send(Method::DELETE, uri, None).await
    }

    pub async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> TestResponse {
        let mut request = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(body) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => request.body(Body::empty()),
        }
        .unwrap();

        let response = self.router.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let request_id = response.headers().get("x-request-id").cloned();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        TestResponse {
            status,
            request_id,
            body,
        }
    }
}
