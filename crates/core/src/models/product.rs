//! Catalog product and its payload conversions.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value, json};

use crate::error::ModelError;
use crate::types::{ProductId, parse_price};

/// Maximum number of image URLs kept per product.
pub const MAX_IMAGES: usize = 3;

/// Name used when the payload carries none.
pub const PLACEHOLDER_NAME: &str = "Unnamed product";

/// A product as listed in the catalog.
///
/// Serializes to (and deserializes from) the same payload shape the product
/// endpoint returns, so a persisted product is re-validated on load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Product {
    id: ProductId,
    name: String,
    price: Decimal,
    images: Vec<String>,
    sizes: Vec<String>,
}

impl Product {
    /// Create a product. Images beyond [`MAX_IMAGES`] are dropped.
    #[must_use]
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Decimal,
        mut images: Vec<String>,
        sizes: Vec<String>,
    ) -> Self {
        images.truncate(MAX_IMAGES);
        Self {
            id,
            name: name.into(),
            price,
            images,
            sizes,
        }
    }

    /// Parse a product from an `aProduct` entry.
    ///
    /// Missing `name`, `price`, `photos` and `sizes` fall back to defaults:
    /// [`PLACEHOLDER_NAME`], zero, and empty lists. Size order follows the
    /// iteration order of the decoded `sizes` map, which is document order
    /// with `serde_json/preserve_order` and is not part of the API contract.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MalformedProduct` if the payload is not an object
    /// or `id` is missing or non-numeric.
    pub fn parse(raw: &Value) -> Result<Self, ModelError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| ModelError::MalformedProduct("payload is not an object".to_string()))?;

        let id = match obj.get("id") {
            Some(value) => parse_id(value)
                .ok_or_else(|| ModelError::MalformedProduct(format!("non-numeric id: {value}")))?,
            None => return Err(ModelError::MalformedProduct("missing field `id`".to_string())),
        };

        let name = obj
            .get("name")
            .and_then(Value::as_str)
            .unwrap_or(PLACEHOLDER_NAME)
            .to_string();

        let price = obj
            .get("price")
            .and_then(parse_price)
            .unwrap_or(Decimal::ZERO);

        let images = obj
            .get("photos")
            .and_then(Value::as_array)
            .map(|photos| {
                photos
                    .iter()
                    .filter_map(|photo| photo.get("big").and_then(Value::as_str))
                    .take(MAX_IMAGES)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let sizes = obj.get("sizes").map(flatten_sizes).unwrap_or_default();

        Ok(Self {
            id,
            name,
            price,
            images,
            sizes,
        })
    }

    /// Convert back to the API payload shape.
    ///
    /// The price is written as a decimal string and sizes as a map keyed by
    /// position, so `Product::parse(&p.to_payload()) == p`.
    #[must_use]
    pub fn to_payload(&self) -> Value {
        let photos: Vec<Value> = self.images.iter().map(|url| json!({ "big": url })).collect();
        let sizes: Map<String, Value> = self
            .sizes
            .iter()
            .enumerate()
            .map(|(i, name)| (i.to_string(), json!({ "name": name })))
            .collect();

        json!({
            "id": self.id.as_i64(),
            "name": self.name,
            "price": self.price.to_string(),
            "photos": photos,
            "sizes": sizes,
        })
    }

    #[must_use]
    pub const fn id(&self) -> ProductId {
        self.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn price(&self) -> Decimal {
        self.price
    }

    /// Image URLs, at most [`MAX_IMAGES`], in payload order.
    #[must_use]
    pub fn images(&self) -> &[String] {
        &self.images
    }

    #[must_use]
    pub fn sizes(&self) -> &[String] {
        &self.sizes
    }

    /// Whether `size` is one of this product's sizes.
    #[must_use]
    pub fn has_size(&self, size: &str) -> bool {
        self.sizes.iter().any(|s| s == size)
    }
}

fn parse_id(value: &Value) -> Option<ProductId> {
    match value {
        Value::Number(n) => n.as_i64().map(ProductId::new),
        Value::String(s) => s.trim().parse::<i64>().ok().map(ProductId::new),
        _ => None,
    }
}

/// Flatten `{key: {name}}` (or `[{name}]`) into size names.
fn flatten_sizes(value: &Value) -> Vec<String> {
    let name_of = |entry: &Value| entry.get("name").and_then(Value::as_str).map(str::to_string);
    match value {
        Value::Object(map) => map.values().filter_map(name_of).collect(),
        Value::Array(entries) => entries.iter().filter_map(name_of).collect(),
        _ => Vec::new(),
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_payload().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Product {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn full_payload() -> Value {
        json!({
            "id": 101,
            "name": "Linen Shirt",
            "price": 39.9,
            "photos": [
                {"big": "https://cdn.example/1.jpg", "small": "s1"},
                {"big": "https://cdn.example/2.jpg"},
                {"big": "https://cdn.example/3.jpg"},
                {"big": "https://cdn.example/4.jpg"}
            ],
            "sizes": {
                "17": {"name": "S"},
                "3": {"name": "M"},
                "9": {"name": "L"}
            }
        })
    }

    #[test]
    fn test_parse_full_product() {
        let product = Product::parse(&full_payload()).expect("valid product");
        assert_eq!(product.id(), ProductId::new(101));
        assert_eq!(product.name(), "Linen Shirt");
        assert_eq!(product.price(), Decimal::from_str("39.9").expect("decimal"));
        assert_eq!(
            product.images(),
            [
                "https://cdn.example/1.jpg",
                "https://cdn.example/2.jpg",
                "https://cdn.example/3.jpg"
            ]
        );
        assert_eq!(product.sizes(), ["S", "M", "L"]);
        assert!(product.has_size("M"));
        assert!(!product.has_size("XL"));
    }

    #[test]
    fn test_parse_applies_defaults() {
        let product = Product::parse(&json!({"id": 5})).expect("id is enough");
        assert_eq!(product.name(), PLACEHOLDER_NAME);
        assert_eq!(product.price(), Decimal::ZERO);
        assert!(product.images().is_empty());
        assert!(product.sizes().is_empty());
    }

    #[test]
    fn test_parse_non_numeric_price_defaults_to_zero() {
        let product = Product::parse(&json!({"id": 5, "price": "call us"})).expect("valid");
        assert_eq!(product.price(), Decimal::ZERO);
    }

    #[test]
    fn test_parse_numeric_string_id() {
        let product = Product::parse(&json!({"id": "77"})).expect("numeric string id");
        assert_eq!(product.id(), ProductId::new(77));
    }

    #[test]
    fn test_parse_rejects_bad_id() {
        assert!(matches!(
            Product::parse(&json!({"name": "No id"})),
            Err(ModelError::MalformedProduct(_))
        ));
        assert!(matches!(
            Product::parse(&json!({"id": "abc"})),
            Err(ModelError::MalformedProduct(_))
        ));
        assert!(matches!(
            Product::parse(&json!({"id": 1.5})),
            Err(ModelError::MalformedProduct(_))
        ));
    }

    #[test]
    fn test_parse_skips_malformed_photos_and_sizes() {
        let raw = json!({
            "id": 1,
            "photos": [{"small": "x"}, {"big": "a"}, "junk", {"big": "b"}],
            "sizes": {"1": {"label": "?"}, "2": {"name": "XS"}}
        });
        let product = Product::parse(&raw).expect("valid");
        assert_eq!(product.images(), ["a", "b"]);
        assert_eq!(product.sizes(), ["XS"]);
    }

    #[test]
    fn test_parse_size_array() {
        let raw = json!({"id": 1, "sizes": [{"name": "38"}, {"name": "40"}]});
        let product = Product::parse(&raw).expect("valid");
        assert_eq!(product.sizes(), ["38", "40"]);
    }

    #[test]
    fn test_payload_round_trip() {
        let product = Product::parse(&full_payload()).expect("valid product");
        let reparsed = Product::parse(&product.to_payload()).expect("round trip");
        assert_eq!(reparsed, product);

        let sparse = Product::parse(&json!({"id": 9})).expect("valid");
        assert_eq!(Product::parse(&sparse.to_payload()).expect("round trip"), sparse);
    }

    #[test]
    fn test_serde_round_trip_keeps_size_order() {
        let product = Product::new(
            ProductId::new(3),
            "Coat",
            Decimal::new(12_950, 2),
            vec![],
            (1..=11).map(|n| format!("size-{n}")).collect(),
        );
        let json = serde_json::to_string(&product).expect("serialize");
        let back: Product = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, product);
    }

    #[test]
    fn test_new_truncates_images() {
        let images = (0..5).map(|i| format!("img-{i}")).collect();
        let product = Product::new(ProductId::new(1), "x", Decimal::ONE, images, vec![]);
        assert_eq!(product.images().len(), MAX_IMAGES);
        assert_eq!(product.images().first().map(String::as_str), Some("img-0"));
    }
}
