//! Unified error handling.
//!
//! Each layer has its own error enum; `StorefrontError` wraps them for
//! callers (such as the CLI) that drive more than one layer.

use thiserror::Error;

use crate::cart::CartError;
use crate::config::ConfigError;
use crate::persistence::StoreError;
use crate::shop::ApiError;

/// Error type for storefront operations that cross layers.
#[derive(Debug, Error)]
pub enum StorefrontError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Shop API operation failed.
    #[error("Shop API error: {0}")]
    Api(#[from] ApiError),

    /// Cart operation failed.
    #[error("Cart error: {0}")]
    Cart(#[from] CartError),

    /// Persistence backend failed outside a cart operation.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// Caller asked for something that does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller input is invalid.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl StorefrontError {
    /// Message suitable for an end user.
    ///
    /// Transport and decoding details stay in the logs.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Http { status, .. }) => {
                format!("The shop is not responding properly (status {status})")
            }
            Self::Api(ApiError::Transport(_)) => "Could not reach the shop".to_string(),
            Self::Api(ApiError::Decode(_) | ApiError::Malformed(_)) => {
                "The shop sent data that could not be read".to_string()
            }
            Self::Cart(CartError::Persist(_) | CartError::Serialize(_)) | Self::Store(_) => {
                "The cart could not be saved".to_string()
            }
            _ => self.to_string(),
        }
    }
}

/// Result type alias for `StorefrontError`.
pub type Result<T> = std::result::Result<T, StorefrontError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StorefrontError::NotFound("product 42".to_string());
        assert_eq!(err.to_string(), "Not found: product 42");

        let err = StorefrontError::BadRequest("size is required".to_string());
        assert_eq!(err.to_string(), "Bad request: size is required");
    }

    #[test]
    fn test_user_message_hides_details() {
        let err = StorefrontError::from(ApiError::Transport("tcp connect error: 10.0.0.1".into()));
        assert_eq!(err.user_message(), "Could not reach the shop");

        let err = StorefrontError::from(ApiError::Http {
            status: 502,
            body: "<html>upstream</html>".into(),
        });
        assert!(err.user_message().contains("502"));
        assert!(!err.user_message().contains("upstream"));

        let err = StorefrontError::from(CartError::Persist(StoreError::Unavailable(
            "disk full".into(),
        )));
        assert_eq!(err.user_message(), "The cart could not be saved");
    }

    #[test]
    fn test_user_message_passes_through_caller_errors() {
        let err = StorefrontError::NotFound("line 1".to_string());
        assert_eq!(err.user_message(), "Not found: line 1");
    }
}
