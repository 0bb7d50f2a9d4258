//! Catalog category.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ModelError;

/// A named filter bucket for products.
///
/// `url` is the API category key sent as the product filter. The empty `url`
/// belongs to the synthetic "All" category, which the API never returns.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    id: String,
    url: String,
    name: String,
}

impl Category {
    /// Id of the synthetic "All" category.
    pub const ALL_ID: &'static str = "all";

    /// Create a category from its parts.
    #[must_use]
    pub fn new(id: impl Into<String>, url: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
            name: name.into(),
        }
    }

    /// The synthetic "All" category injected at the head of every category list.
    #[must_use]
    pub fn all() -> Self {
        Self::new(Self::ALL_ID, "", "All")
    }

    /// Parse a category from an `aMenu` entry.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::MalformedCategory` if the payload is not an object
    /// or if `id`, `url` or `name` is missing or not a string.
    pub fn parse(raw: &Value) -> Result<Self, ModelError> {
        let obj = raw
            .as_object()
            .ok_or_else(|| ModelError::MalformedCategory("payload is not an object".to_string()))?;

        let field = |key: &str| -> Result<String, ModelError> {
            match obj.get(key) {
                Some(Value::String(s)) => Ok(s.clone()),
                Some(other) => Err(ModelError::MalformedCategory(format!(
                    "field `{key}` must be a string, got {other}"
                ))),
                None => Err(ModelError::MalformedCategory(format!(
                    "missing field `{key}`"
                ))),
            }
        };

        Ok(Self {
            id: field("id")?,
            url: field("url")?,
            name: field("name")?,
        })
    }

    /// Category id as sent by the API.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Filter key used in product requests.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Whether this is the "All" category (no filter).
    #[must_use]
    pub fn is_all(&self) -> bool {
        self.url.is_empty()
    }
}
