//! Request bodies and response envelopes of the shop API.
//!
//! Category request: `{shop, lang, category}`, answered by
//! `{api_data: {aMenu: [{type, id, url, name}, ...]}}`.
//!
//! Product request: `{shop, lang, limit, page, category?}`, answered by
//! `{api_data: {aProduct: [<product payload>, ...]}}`. The `category` field is
//! omitted entirely for the "All" category.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use wardrobe_core::{Category, Product};

use super::ApiError;

/// Body of the category listing request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryQuery {
    pub shop: u32,
    pub lang: u32,
    pub category: String,
}

/// Body of the product listing request.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ProductQuery {
    pub shop: u32,
    pub lang: u32,
    pub limit: u32,
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Deserialize)]
struct Envelope<T> {
    api_data: T,
}

#[derive(Deserialize)]
struct MenuData {
    #[serde(rename = "aMenu")]
    menu: Vec<Value>,
}

#[derive(Deserialize)]
struct ProductData {
    // null or absent past the last page
    #[serde(rename = "aProduct")]
    products: Option<Vec<Value>>,
}

/// Decode a category response, keeping only entries of type `category`.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the envelope is wrong and
/// `ApiError::Malformed` if a category entry fails validation.
pub fn decode_categories(body: &str) -> Result<Vec<Category>, ApiError> {
    let envelope: Envelope<MenuData> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    envelope
        .api_data
        .menu
        .iter()
        .filter(|entry| entry.get("type").and_then(Value::as_str) == Some("category"))
        .map(|entry| Category::parse(entry).map_err(ApiError::from))
        .collect()
}

/// Decode a product page.
///
/// # Errors
///
/// Returns `ApiError::Decode` if the envelope is wrong and
/// `ApiError::Malformed` if a product entry fails validation.
pub fn decode_products(body: &str) -> Result<Vec<Product>, ApiError> {
    let envelope: Envelope<ProductData> =
        serde_json::from_str(body).map_err(|e| ApiError::Decode(e.to_string()))?;

    envelope
        .api_data
        .products
        .unwrap_or_default()
        .iter()
        .map(|entry| Product::parse(entry).map_err(ApiError::from))
        .collect()
}
