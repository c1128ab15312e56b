//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (bottom to top in Router)
//!
//! 1. Sentry layer (capture errors)
//! 2. `TraceLayer` (request tracing)
//! 3. Request ID (add unique ID to each request)
//! 4. Session lock (one request per session cookie at a time)
//! 5. Session layer (tower-sessions with `PostgreSQL` store)
//!
//! The [`SessionCart`] extractor reads the visitor's cart from the session.

pub mod cart;
pub mod request_id;
pub mod session;
pub mod session_lock;

pub use cart::SessionCart;
pub use request_id::request_id_middleware;
pub use session::{configure_session_layer, create_session_layer};
pub use session_lock::{SessionLocks, session_lock_middleware};
