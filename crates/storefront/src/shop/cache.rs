//! Cache types for shop API responses.

use wardrobe_core::{Category, Product};

use super::wire::ProductQuery;

/// Cache key for category lists and product pages.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Categories,
    Products(ProductQuery),
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Categories(Vec<Category>),
    Products(Vec<Product>),
}
