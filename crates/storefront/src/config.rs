//! Storefront configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Required
//! - `SHOP_API_BASE_URL` - Base URL of the shop API (e.g., `https://api.example.com/v1/`)
//!
//! ## Optional
//! - `SHOP_CATEGORIES_PATH` - Category endpoint relative to the base (default: menu)
//! - `SHOP_PRODUCTS_PATH` - Product endpoint relative to the base (default: products)
//! - `SHOP_ID` - Shop id sent with every request (default: 2)
//! - `SHOP_LANG` - Language id (default: 1)
//! - `SHOP_CATEGORY_SCOPE` - Category scope of the menu request (default: clothes)
//! - `SHOP_PAGE_SIZE` - Products per page (default: 12)
//! - `SHOP_API_TOKEN` - Bearer token, if the API requires one
//! - `SHOP_CACHE_TTL_SECS` - Response cache TTL, 0 disables caching (default: 300)
//! - `SHOP_HTTP_TIMEOUT_SECS` - HTTP request timeout (default: 30)
//! - `WARDROBE_DATA_DIR` - Directory for the persisted cart (default: platform data dir)
//! - `WARDROBE_CART_KEY` - Key the cart is stored under (default: `cart_items`)

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use url::Url;

const MIN_ENTROPY_BITS_PER_CHAR: f64 = 3.3;

/// Default number of products per page.
pub const DEFAULT_PAGE_SIZE: u32 = 12;

/// Default key the cart blob is stored under.
pub const DEFAULT_CART_KEY: &str = "cart_items";

/// Blocklist of common placeholder patterns (case-insensitive)
const PLACEHOLDER_PATTERNS: &[&str] = &[
    "your-",
    "changeme",
    "replace",
    "placeholder",
    "example",
    "xxx",
    "todo",
    "fixme",
    "insert",
    "put-your",
];

/// Configuration errors that can occur during loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
    #[error("Insecure secret in {0}: {1}")]
    InsecureSecret(String, String),
}

/// Complete storefront configuration.
#[derive(Debug, Clone)]
pub struct ShopConfig {
    /// Shop API connection settings
    pub api: ShopApiConfig,
    /// Cart persistence settings
    pub cart: CartConfig,
}

/// Shop API configuration.
///
/// Implements `Debug` manually to redact the API token.
#[derive(Clone)]
pub struct ShopApiConfig {
    /// Base URL all endpoint paths are resolved against
    pub base_url: Url,
    /// Category listing endpoint, relative to `base_url`
    pub categories_path: String,
    /// Product listing endpoint, relative to `base_url`
    pub products_path: String,
    /// Shop id (`shop` field)
    pub shop_id: u32,
    /// Language id (`lang` field)
    pub lang_id: u32,
    /// Category scope of the menu request
    pub category_scope: String,
    /// Products per page (`limit` field)
    pub page_size: u32,
    /// Optional bearer token
    pub api_token: Option<SecretString>,
    /// Response cache TTL; zero disables the cache
    pub cache_ttl: Duration,
    /// HTTP request timeout
    pub http_timeout: Duration,
}

impl std::fmt::Debug for ShopApiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopApiConfig")
            .field("base_url", &self.base_url.as_str())
            .field("categories_path", &self.categories_path)
            .field("products_path", &self.products_path)
            .field("shop_id", &self.shop_id)
            .field("lang_id", &self.lang_id)
            .field("category_scope", &self.category_scope)
            .field("page_size", &self.page_size)
            .field("api_token", &self.api_token.as_ref().map(|_| "[REDACTED]"))
            .field("cache_ttl", &self.cache_ttl)
            .field("http_timeout", &self.http_timeout)
            .finish()
    }
}

impl ShopApiConfig {
    /// Configuration with defaults for everything except the base URL.
    #[must_use]
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            categories_path: "menu".to_string(),
            products_path: "products".to_string(),
            shop_id: 2,
            lang_id: 1,
            category_scope: "clothes".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            api_token: None,
            cache_ttl: Duration::from_secs(300),
            http_timeout: Duration::from_secs(30),
        }
    }

    /// Absolute URL of the category endpoint.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the path cannot be joined to the base.
    pub fn categories_url(&self) -> Result<Url, url::ParseError> {
        join_endpoint(&self.base_url, &self.categories_path)
    }

    /// Absolute URL of the product endpoint.
    ///
    /// # Errors
    ///
    /// Returns `url::ParseError` if the path cannot be joined to the base.
    pub fn products_url(&self) -> Result<Url, url::ParseError> {
        join_endpoint(&self.base_url, &self.products_path)
    }

    fn from_vars(vars: &impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let base_url = get_required(vars, "SHOP_API_BASE_URL")?;
        let base_url = Url::parse(&base_url).map_err(|e| {
            ConfigError::InvalidEnvVar("SHOP_API_BASE_URL".to_string(), e.to_string())
        })?;

        let page_size = get_parsed(vars, "SHOP_PAGE_SIZE", DEFAULT_PAGE_SIZE)?;
        if page_size == 0 {
            return Err(ConfigError::InvalidEnvVar(
                "SHOP_PAGE_SIZE".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let api_token = match vars("SHOP_API_TOKEN") {
            Some(token) if !token.is_empty() => {
                validate_secret_strength(&token, "SHOP_API_TOKEN")?;
                Some(SecretString::from(token))
            }
            _ => None,
        };

        Ok(Self {
            base_url,
            categories_path: get_or_default(vars, "SHOP_CATEGORIES_PATH", "menu"),
            products_path: get_or_default(vars, "SHOP_PRODUCTS_PATH", "products"),
            shop_id: get_parsed(vars, "SHOP_ID", 2)?,
            lang_id: get_parsed(vars, "SHOP_LANG", 1)?,
            category_scope: get_or_default(vars, "SHOP_CATEGORY_SCOPE", "clothes"),
            page_size,
            api_token,
            cache_ttl: Duration::from_secs(get_parsed(vars, "SHOP_CACHE_TTL_SECS", 300)?),
            http_timeout: Duration::from_secs(get_parsed(vars, "SHOP_HTTP_TIMEOUT_SECS", 30)?),
        })
    }
}

/// Cart persistence configuration.
#[derive(Debug, Clone)]
pub struct CartConfig {
    /// Directory the file store writes into
    pub data_dir: PathBuf,
    /// Key the cart blob is stored under
    pub storage_key: String,
}

impl CartConfig {
    fn from_vars(vars: &impl Fn(&str) -> Option<String>) -> Self {
        let data_dir = vars("WARDROBE_DATA_DIR").map_or_else(default_data_dir, PathBuf::from);
        Self {
            data_dir,
            storage_key: get_or_default(vars, "WARDROBE_CART_KEY", DEFAULT_CART_KEY),
        }
    }
}

impl ShopConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();
        Self::from_vars(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or invalid.
    pub fn from_vars(vars: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            api: ShopApiConfig::from_vars(&vars)?,
            cart: CartConfig::from_vars(&vars),
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Join an endpoint path to the base URL, treating the base as a directory.
fn join_endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
    if base.path().ends_with('/') {
        base.join(path)
    } else {
        let mut base = base.clone();
        base.set_path(&format!("{}/", base.path()));
        base.join(path)
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wardrobe")
}

/// Get a required variable.
fn get_required(vars: &impl Fn(&str) -> Option<String>, key: &str) -> Result<String, ConfigError> {
    vars(key).ok_or_else(|| ConfigError::MissingEnvVar(key.to_string()))
}

/// Get a variable with a default value.
fn get_or_default(vars: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    vars(key).unwrap_or_else(|| default.to_string())
}

/// Get a variable parsed into `T`, or `default` when unset.
fn get_parsed<T>(
    vars: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    vars(key).map_or(Ok(default), |value| {
        value
            .trim()
            .parse::<T>()
            .map_err(|e| ConfigError::InvalidEnvVar(key.to_string(), e.to_string()))
    })
}

/// Calculate Shannon entropy in bits per character.
fn shannon_entropy(s: &str) -> f64 {
    if s.is_empty() {
        return 0.0;
    }

    let mut freq: HashMap<char, usize> = HashMap::new();
    for c in s.chars() {
        *freq.entry(c).or_insert(0) += 1;
    }

    #[allow(clippy::cast_precision_loss)] // String length will never exceed f64 precision
    let len = s.chars().count() as f64;
    freq.values()
        .map(|&count| {
            #[allow(clippy::cast_precision_loss)] // Character count will never exceed f64 precision
            let p = count as f64 / len;
            -p * p.log2()
        })
        .sum()
}

/// Validate that a token is not a placeholder and has sufficient entropy.
fn validate_secret_strength(secret: &str, var_name: &str) -> Result<(), ConfigError> {
    let lower = secret.to_lowercase();

    for pattern in PLACEHOLDER_PATTERNS {
        if lower.contains(pattern) {
            return Err(ConfigError::InsecureSecret(
                var_name.to_string(),
                format!("appears to be a placeholder (contains '{pattern}')"),
            ));
        }
    }

    let entropy = shannon_entropy(secret);
    if entropy < MIN_ENTROPY_BITS_PER_CHAR {
        return Err(ConfigError::InsecureSecret(
            var_name.to_string(),
            format!(
                "entropy too low ({entropy:.2} bits/char, need >= {MIN_ENTROPY_BITS_PER_CHAR:.1})"
            ),
        ));
    }

    Ok(())
}

/// Expose the bearer token for an `Authorization` header.
pub(crate) fn bearer_token(config: &ShopApiConfig) -> Option<String> {
    config
        .api_token
        .as_ref()
        .map(|token| format!("Bearer {}", token.expose_secret()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config =
            ShopConfig::from_vars(lookup(&[("SHOP_API_BASE_URL", "https://api.example.com/v1/")]))
                .unwrap();
        assert_eq!(config.api.shop_id, 2);
        assert_eq!(config.api.lang_id, 1);
        assert_eq!(config.api.category_scope, "clothes");
        assert_eq!(config.api.page_size, 12);
        assert_eq!(config.api.cache_ttl, Duration::from_secs(300));
        assert!(config.api.api_token.is_none());
        assert_eq!(config.cart.storage_key, DEFAULT_CART_KEY);
    }

    #[test]
    fn test_missing_base_url() {
        let err = ShopConfig::from_vars(lookup(&[])).unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref key) if key == "SHOP_API_BASE_URL"));
    }

    #[test]
    fn test_invalid_numbers() {
        let err = ShopConfig::from_vars(lookup(&[
            ("SHOP_API_BASE_URL", "https://api.example.com"),
            ("SHOP_ID", "two"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOP_ID"));

        let err = ShopConfig::from_vars(lookup(&[
            ("SHOP_API_BASE_URL", "https://api.example.com"),
            ("SHOP_PAGE_SIZE", "0"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar(ref key, _) if key == "SHOP_PAGE_SIZE"));
    }

    #[test]
    fn test_overrides() {
        let config = ShopConfig::from_vars(lookup(&[
            ("SHOP_API_BASE_URL", "https://api.example.com"),
            ("SHOP_PAGE_SIZE", "24"),
            ("SHOP_CACHE_TTL_SECS", "0"),
            ("WARDROBE_DATA_DIR", "/tmp/wardrobe-test"),
            ("WARDROBE_CART_KEY", "bag"),
        ]))
        .unwrap();
        assert_eq!(config.api.page_size, 24);
        assert_eq!(config.api.cache_ttl, Duration::ZERO);
        assert_eq!(config.cart.data_dir, PathBuf::from("/tmp/wardrobe-test"));
        assert_eq!(config.cart.storage_key, "bag");
    }

    #[test]
    fn test_endpoint_urls_treat_base_as_directory() {
        let config = ShopApiConfig::new(Url::parse("https://api.example.com/v1").unwrap());
        assert_eq!(
            config.categories_url().unwrap().as_str(),
            "https://api.example.com/v1/menu"
        );

        let config = ShopApiConfig::new(Url::parse("https://api.example.com/v1/").unwrap());
        assert_eq!(
            config.products_url().unwrap().as_str(),
            "https://api.example.com/v1/products"
        );
    }

    #[test]
    fn test_placeholder_token_rejected() {
        let err = ShopConfig::from_vars(lookup(&[
            ("SHOP_API_BASE_URL", "https://api.example.com"),
            ("SHOP_API_TOKEN", "your-token-here"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::InsecureSecret(_, _)));
    }

    #[test]
    fn test_low_entropy_token_rejected() {
        assert!(validate_secret_strength("aaaaaaaaaaaaaaaa", "SHOP_API_TOKEN").is_err());
        assert!(
            validate_secret_strength("aB3$xY9!mK2@nL5#pQ7&rT0*uW4^zC6", "SHOP_API_TOKEN").is_ok()
        );
    }

    #[test]
    fn test_shannon_entropy() {
        assert!((shannon_entropy("") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("aaaa") - 0.0).abs() < f64::EPSILON);
        assert!((shannon_entropy("ab") - 1.0).abs() < 0.01);
    }

    #[test]
    fn test_debug_redacts_token() {
        let mut config = ShopApiConfig::new(Url::parse("https://api.example.com").unwrap());
        config.api_token = Some(SecretString::from("super_secret_token_value"));

        let debug_output = format!("{config:?}");
        assert!(debug_output.contains("api.example.com"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super_secret_token_value"));
        assert_eq!(
            bearer_token(&config).as_deref(),
            Some("Bearer super_secret_token_value")
        );
    }
}
