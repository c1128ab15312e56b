//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                        - Health check
//!
//! # Cart (session-backed)
//! GET    /api/cart                      - Cart contents and totals
//! POST   /api/cart/items                - Add one unit of a product
//! POST   /api/cart/items/{id}/quantity  - Change quantity by {delta}
//! DELETE /api/cart/items/{id}           - Remove a line item
//! DELETE /api/cart                      - Clear the cart
//! GET    /api/cart/count                - Cart count badge
//!
//! # Catalog
//! GET    /api/products                  - Filtered, sorted, paginated listing
//! GET    /api/products/best-selling     - Best sellers row
//! GET    /api/products/best-reviewed    - Best reviewed row
//! GET    /api/products/{id}             - Product detail
//! GET    /api/products/{id}/reviews     - Reviews and mean rating
//! GET    /api/categories                - Category list
//! GET    /api/brands                    - Brand list
//!
//! # Orders
//! GET    /api/orders?userId=            - A shopper's order history
//!
//! # Checkout
//! POST   /api/coupons/validate          - Discount for a coupon on this cart
//! POST   /api/checkout                  - Create a payment session
//!
//! # Session
//! POST   /api/logout                    - Clear cart and end session
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod orders;
pub mod products;

use axum::{
    Router, middleware,
    routing::{delete, get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::{request_id_middleware, session_lock_middleware};
use crate::state::AppState;

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route("/items/{id}", delete(cart::remove))
        .route("/items/{id}/quantity", post(cart::change_quantity))
        .route("/count", get(cart::count))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/best-selling", get(products::best_selling))
        .route("/best-reviewed", get(products::best_reviewed))
        .route("/{id}", get(products::show))
        .route("/{id}/reviews", get(products::reviews))
}

/// Create all API routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/cart", cart_routes())
        .nest("/api/products", product_routes())
        .route("/api/categories", get(catalog::categories))
        .route("/api/brands", get(catalog::brands))
        .route("/api/orders", get(orders::index))
        .route("/api/coupons/validate", post(checkout::validate_coupon))
        .route("/api/checkout", post(checkout::checkout))
        .route("/api/logout", post(auth::logout))
}

/// Build the application with sessions, tracing and request IDs.
///
/// The session layer is passed in so the binary can use the `PostgreSQL`
/// store and tests an in-memory one. Requests sharing a session cookie are
/// serialized outside it, so each one sees the previous one's saved cart.
pub fn app<S>(state: AppState, sessions: SessionManagerLayer<S>) -> Router
where
    S: SessionStore + Clone,
{
    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(sessions)
        .layer(middleware::from_fn_with_state(
            state.session_locks().clone(),
            session_lock_middleware,
        ))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
