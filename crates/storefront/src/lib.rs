//! Nordic Storefront library.
//!
//! JSON API over the visitor's session cart, the backend catalog and the
//! payment hand-off. Exposed as a library so the binary and the integration
//! tests build the same router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

pub use routes::app;
pub use state::AppState;
