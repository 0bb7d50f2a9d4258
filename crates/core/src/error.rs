//! Errors raised while validating API payloads.

use thiserror::Error;

/// A payload failed required-field validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Category payload is missing a field or has one of the wrong type.
    #[error("Malformed category: {0}")]
    MalformedCategory(String),

    /// Product payload has a missing or non-numeric id.
    #[error("Malformed product: {0}")]
    MalformedProduct(String),

    /// Persisted cart line could not be reconstructed.
    #[error("Malformed cart item: {0}")]
    MalformedCartItem(String),
}
