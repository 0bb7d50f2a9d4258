//! State of the catalog screen.

use wardrobe_core::{Category, Product};

use crate::mvi::UiState;

/// Identifies one product page fetch.
///
/// `generation` changes on every product reset, so a request issued before a
/// category switch never matches one issued after it, even for the same
/// category and page.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PageRequest {
    pub category_url: String,
    pub page: u32,
    pub generation: u64,
}

/// Catalog state: categories, selection, loaded products and pagination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogState {
    /// "All" first, then API categories. Empty until the first load.
    pub categories: Vec<Category>,
    /// Filter of the selected category; empty means "All".
    pub selected_category_url: String,
    /// Products loaded so far, in page order.
    pub products: Vec<Product>,
    pub is_loading: bool,
    /// Next page to fetch, starting at 1.
    pub current_page: u32,
    /// False once a short page has been received.
    pub has_more: bool,
    pub in_flight: Option<PageRequest>,
    pub generation: u64,
}

impl Default for CatalogState {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            selected_category_url: String::new(),
            products: Vec::new(),
            is_loading: false,
            current_page: 1,
            has_more: true,
            in_flight: None,
            generation: 0,
        }
    }
}

impl UiState for CatalogState {}

impl CatalogState {
    /// Whether a page fetch may start now.
    #[must_use]
    pub const fn can_load_more(&self) -> bool {
        self.has_more && !self.is_loading
    }

    /// The request the next page fetch would carry.
    #[must_use]
    pub fn next_request(&self) -> PageRequest {
        PageRequest {
            category_url: self.selected_category_url.clone(),
            page: self.current_page,
            generation: self.generation,
        }
    }

    /// The selected category, once categories are loaded.
    #[must_use]
    pub fn selected_category(&self) -> Option<&Category> {
        self.categories
            .iter()
            .find(|category| category.url() == self.selected_category_url)
    }

    /// Whether `request` is the fetch currently awaited.
    #[must_use]
    pub fn is_current(&self, request: &PageRequest) -> bool {
        self.in_flight.as_ref() == Some(request)
    }
}
