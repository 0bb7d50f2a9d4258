//! Intents for the catalog state machine.

use wardrobe_core::{Category, Product};

use super::state::PageRequest;
use crate::mvi::Intent;

/// Intents that can be dispatched to the catalog reducer.
#[derive(Debug, Clone)]
pub enum CatalogIntent {
    /// Category menu decoded. Carries API categories only; "All" is
    /// prepended by the reducer and becomes the selection.
    CategoriesLoaded(Vec<Category>),

    /// User picked a category filter.
    CategorySelected(String),

    /// Start the product list over: page 1, no products, more available.
    /// Abandons any in-flight fetch.
    ResetProducts,

    /// A page fetch is starting.
    PageRequested(PageRequest),

    /// A page arrived.
    PageLoaded {
        request: PageRequest,
        products: Vec<Product>,
        page_size: u32,
    },

    /// A page fetch failed.
    PageFailed { request: PageRequest },

    /// A page fetch ended without a result (cancelled or panicked).
    PageAbandoned { request: PageRequest },
}

impl Intent for CatalogIntent {}
