//! Nordic Core - Storefront state library.
//!
//! This crate holds the client-side state of the Nordic storefront and is
//! shared by the storefront service and the CLI:
//! - `storefront` - JSON API serving carts from the visitor's session
//! - `cli` - Local cart and session-table management
//!
//! # Architecture
//!
//! The core crate contains no HTTP clients and no async code. Persistence goes
//! through the synchronous [`store::KeyValueStore`] trait so the same cart
//! logic runs against a session buffer, a JSON file, or memory.
//!
//! # Modules
//!
//! - [`cart`] - Cart line items and the persisted cart manager
//! - [`catalog`] - In-memory product filtering, sorting, and pagination
//! - [`checkout`] - Address and coupon validation, checkout payloads
//! - [`order`] - Order history summaries
//! - [`product`] - Alias resolution over backend product records
//! - [`review`] - Review counts and mean ratings
//! - [`store`] - Key-value stores
//! - [`taxonomy`] - Category and brand entries
//! - [`types`] - Newtype wrappers for IDs and price coercion

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod order;
pub mod product;
pub mod review;
pub mod store;
pub mod taxonomy;
pub mod types;

pub use cart::{Cart, CartLineItem, CartManager};
pub use product::ProductRecord;
pub use types::*;
