//! Per-session request serialization.
//!
//! Carts are read from the session, changed, and written back when the
//! session layer saves after the handler. Two requests carrying the same
//! session cookie would otherwise interleave and the later save would drop
//! the earlier change. This middleware sits outside the session layer and
//! holds a per-cookie lock for the whole request.

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use moka::future::Cache;
use tokio::sync::Mutex;
use tower_sessions::cookie::Cookie;

use super::session::SESSION_COOKIE_NAME;

/// Idle time after which a session's lock is forgotten.
const LOCK_IDLE: Duration = Duration::from_secs(10 * 60);

/// Locks keyed by session cookie value.
#[derive(Clone)]
pub struct SessionLocks {
    locks: Cache<String, Arc<Mutex<()>>>,
}

impl SessionLocks {
    #[must_use]
    pub fn new() -> Self {
        Self {
            locks: Cache::builder().time_to_idle(LOCK_IDLE).build(),
        }
    }

    async fn lock_for(&self, session_id: String) -> Arc<Mutex<()>> {
        self.locks
            .get_with(session_id, async { Arc::new(Mutex::new(())) })
            .await
    }
}

impl Default for SessionLocks {
    fn default() -> Self {
        Self::new()
    }
}

/// Run requests that share a session cookie one at a time.
///
/// Requests without a session cookie get a fresh session of their own and
/// pass straight through.
pub async fn session_lock_middleware(
    State(locks): State<SessionLocks>,
    request: Request,
    next: Next,
) -> Response {
    let Some(session_id) = session_cookie(&request) else {
        return next.run(request).await;
    };

    let lock = locks.lock_for(session_id).await;
    let guard = lock.lock().await;
    let response = next.run(request).await;
    drop(guard);
    response
}

fn session_cookie(request: &Request) -> Option<String> {
    request
        .headers()
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME && !cookie.value().is_empty())
        .map(|cookie| cookie.value().to_owned())
}
