//! Shop API client.
//!
//! # Architecture
//!
//! - [`HttpTransport`] is the HTTP collaborator: POST a JSON body, get back a
//!   status and a body string. [`ReqwestTransport`] is the production one.
//! - [`ShopApiClient`] builds request bodies, checks for `200`, decodes the
//!   `api_data` envelope and validates every entity.
//! - Decoded category lists and product pages are cached via `moka`
//!   (5 minute TTL by default).
//!
//! # Example
//!
//! ```rust,ignore
//! use wardrobe_storefront::shop::ShopApiClient;
//!
//! let client = ShopApiClient::new(config.api.clone())?;
//! let categories = client.fetch_categories().await?;
//! let page = client.fetch_products(&client.product_query("dresses", 1)).await?;
//! ```

mod cache;
mod client;
mod transport;
pub mod wire;

pub use client::ShopApiClient;
pub use transport::{HttpResponse, HttpTransport, ReqwestTransport};
pub use wire::ProductQuery;

use thiserror::Error;
use wardrobe_core::ModelError;

/// Errors that can occur when talking to the shop API.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Request could not complete (connection, TLS, timeout).
    #[error("Transport error: {0}")]
    Transport(String),

    /// API answered with a status other than 200.
    #[error("HTTP error: {status} - {body}")]
    Http { status: u16, body: String },

    /// Body is not JSON or lacks the expected fields.
    #[error("Decode error: {0}")]
    Decode(String),

    /// An entity in the response failed validation.
    #[error("Malformed entity: {0}")]
    Malformed(#[from] ModelError),

    /// Endpoint URL could not be built from configuration.
    #[error("Invalid endpoint URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl ApiError {
    /// Whether retrying the same request might succeed.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        match self {
            Self::Transport(_) => true,
            Self::Http { status, .. } => *status >= 500 || *status == 429,
            Self::Decode(_) | Self::Malformed(_) | Self::InvalidUrl(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Http {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "HTTP error: 503 - maintenance");

        let err = ApiError::from(ModelError::MalformedProduct("missing field `id`".to_string()));
        assert_eq!(
            err.to_string(),
            "Malformed entity: Malformed product: missing field `id`"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(ApiError::Transport("reset".to_string()).is_retryable());
        assert!(
            ApiError::Http {
                status: 502,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(
            !ApiError::Http {
                status: 404,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!ApiError::Decode("eof".to_string()).is_retryable());
    }
}
