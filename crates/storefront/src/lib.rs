//! Wardrobe storefront library.
//!
//! Catalog browsing and cart management over the shop API, independent of
//! any particular UI. The `wardrobe` CLI is one front end; anything that can
//! hold a [`catalog::CatalogController`] and a [`cart::CartStore`] is another.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod mvi;
pub mod persistence;
pub mod shop;
#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use error::{Result, StorefrontError};
