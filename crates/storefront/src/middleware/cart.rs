//! Session-backed cart extractor.
//!
//! The cart is owned by a [`CartManager`] over an in-memory buffer. The
//! extractor fills the buffer from the session, handlers mutate the cart
//! synchronously, and [`SessionCart::save`] writes the buffer back.
//!
//! Requests sharing a session cookie are serialized by
//! [`session_lock_middleware`](super::session_lock_middleware), so the
//! load, mutate and save sequence never interleaves for one visitor.

use std::ops::{Deref, DerefMut};

use axum::{extract::FromRequestParts, http::request::Parts};
use nordic_core::CartManager;
use nordic_core::store::{KeyValueStore, MemoryStore};
use tower_sessions::Session;

use crate::error::AppError;
use crate::models::session_keys;

/// The visitor's cart, loaded from the session.
///
/// # Example
///
/// ```rust,ignore
/// async fn clear(mut cart: SessionCart) -> StatusCode {
///     cart.clear();
///     cart.save().await;
///     StatusCode::NO_CONTENT
/// }
/// ```
pub struct SessionCart {
    session: Session,
    manager: CartManager<MemoryStore>,
}

impl SessionCart {
    /// Restore the cart stored in `session`.
    ///
    /// A session read failure starts an empty cart.
    pub async fn load(session: Session) -> Self {
        let stored = match session.get::<String>(session_keys::CART).await {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(error = %e, "could not read cart from session");
                None
            }
        };

        let buffer = stored.map_or_else(MemoryStore::new, |raw| {
            MemoryStore::with_entry(session_keys::CART, raw)
        });

        Self {
            session,
            manager: CartManager::load(buffer),
        }
    }

    /// Write the cart back to the session.
    ///
    /// Best-effort: a failed write is logged and the request carries on.
    pub async fn save(&self) {
        let raw = match self.manager.store().get(session_keys::CART) {
            Ok(Some(raw)) => raw,
            Ok(None) => return,
            Err(e) => {
                tracing::warn!(error = %e, "could not read cart buffer");
                return;
            }
        };

        if let Err(e) = self.session.insert(session_keys::CART, raw).await {
            tracing::warn!(error = %e, "could not write cart to session");
        }
    }

    /// The session the cart was loaded from.
    #[must_use]
    pub const fn session(&self) -> &Session {
        &self.session
    }
}

impl Deref for SessionCart {
    type Target = CartManager<MemoryStore>;

    fn deref(&self) -> &Self::Target {
        &self.manager
    }
}

impl DerefMut for SessionCart {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.manager
    }
}

impl<S> FromRequestParts<S> for SessionCart
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // Set by SessionManagerLayer
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or_else(|| AppError::Internal("session layer is not installed".to_string()))?;

        Ok(Self::load(session).await)
    }
}
