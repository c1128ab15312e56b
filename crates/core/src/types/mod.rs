//! Core types for the Nordic storefront.
//!
//! This module provides type-safe wrappers for identifiers and prices.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{MAX_PRICE, coerce_price, format_price};
