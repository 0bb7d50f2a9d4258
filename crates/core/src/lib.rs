//! Wardrobe Core - Shared domain types.
//!
//! This crate provides the value types used across all Wardrobe components:
//! - `storefront` - Catalog fetch controller, cart store and shop API client
//! - `cli` - Terminal front end driving the storefront library
//!
//! # Architecture
//!
//! The core crate contains only types and pure parsing functions - no I/O, no
//! HTTP clients, no persistence. Everything here can be constructed from a
//! decoded JSON payload and serialized back to one.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids and price helpers
//! - [`models`] - `Category`, `Product` and `CartItem`
//! - [`error`] - Payload validation errors

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod error;
pub mod models;
pub mod types;

pub use error::ModelError;
pub use models::*;
pub use types::*;
