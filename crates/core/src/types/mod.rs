//! Core types for Wardrobe.
//!
//! This module provides type-safe wrappers for ids and decimal prices.

pub mod id;
pub mod price;

pub use id::*;
pub use price::{format_price, parse_price};
