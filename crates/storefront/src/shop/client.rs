//! Shop API client implementation.

use std::sync::Arc;

use moka::future::Cache;
use serde::Serialize;
use tracing::{debug, error, instrument};
use url::Url;

use wardrobe_core::{Category, Product};

use super::ApiError;
use super::cache::{CacheKey, CacheValue};
use super::transport::{HttpTransport, ReqwestTransport};
use super::wire::{CategoryQuery, ProductQuery, decode_categories, decode_products};
use crate::config::ShopApiConfig;

/// Client for the category and product endpoints.
///
/// Cheaply cloneable; clones share the transport and cache.
#[derive(Clone)]
pub struct ShopApiClient {
    inner: Arc<ShopApiClientInner>,
}

struct ShopApiClientInner {
    transport: Arc<dyn HttpTransport>,
    config: ShopApiConfig,
    categories_url: Url,
    products_url: Url,
    cache: Option<Cache<CacheKey, CacheValue>>,
}

impl ShopApiClient {
    /// Create a client that talks HTTP through `reqwest`.
    ///
    /// # Errors
    ///
    /// Returns an error if the endpoint URLs are invalid or the HTTP client
    /// fails to build.
    pub fn new(config: ShopApiConfig) -> Result<Self, ApiError> {
        let transport = ReqwestTransport::new(&config)?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Create a client over any transport.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the endpoint URLs cannot be built.
    pub fn with_transport(
        config: ShopApiConfig,
        transport: Arc<dyn HttpTransport>,
    ) -> Result<Self, ApiError> {
        let categories_url = config.categories_url()?;
        let products_url = config.products_url()?;

        let cache = (!config.cache_ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(1000)
                .time_to_live(config.cache_ttl)
                .build()
        });

        Ok(Self {
            inner: Arc::new(ShopApiClientInner {
                transport,
                config,
                categories_url,
                products_url,
                cache,
            }),
        })
    }

    /// Products per page.
    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.inner.config.page_size
    }

    #[must_use]
    pub fn config(&self) -> &ShopApiConfig {
        &self.inner.config
    }

    /// Build the product request for a category filter and page.
    ///
    /// An empty `category_url` means "all categories" and omits the filter.
    #[must_use]
    pub fn product_query(&self, category_url: &str, page: u32) -> ProductQuery {
        let config = &self.inner.config;
        ProductQuery {
            shop: config.shop_id,
            lang: config.lang_id,
            limit: config.page_size,
            page,
            category: (!category_url.is_empty()).then(|| category_url.to_string()),
        }
    }

    /// POST a body and return the response text of a `200`.
    async fn execute<B: Serialize + Sync>(&self, url: &Url, body: &B) -> Result<String, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Decode(e.to_string()))?;
        let response = self.inner.transport.post_json(url, &body).await?;

        if response.status != 200 {
            error!(
                status = response.status,
                body = %response.body.chars().take(500).collect::<String>(),
                "Shop API returned non-success status"
            );
            return Err(ApiError::Http {
                status: response.status,
                body: response.body.chars().take(200).collect(),
            });
        }

        Ok(response.body)
    }

    // =========================================================================
    // Category Methods
    // =========================================================================

    /// Fetch the category menu, keeping entries of type `category`.
    ///
    /// The synthetic "All" category is not included.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 200, or the
    /// body cannot be decoded.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Result<Vec<Category>, ApiError> {
        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Categories(categories)) = cache.get(&CacheKey::Categories).await
        {
            debug!("Cache hit for categories");
            return Ok(categories);
        }

        let config = &self.inner.config;
        let query = CategoryQuery {
            shop: config.shop_id,
            lang: config.lang_id,
            category: config.category_scope.clone(),
        };

        let body = self.execute(&self.inner.categories_url, &query).await?;
        let categories = decode_categories(&body)?;
        debug!(count = categories.len(), "Fetched categories");

        if let Some(cache) = &self.inner.cache {
            cache
                .insert(
                    CacheKey::Categories,
                    CacheValue::Categories(categories.clone()),
                )
                .await;
        }

        Ok(categories)
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Fetch one page of products.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the status is not 200, or the
    /// body cannot be decoded.
    #[instrument(skip(self), fields(page = query.page, category = ?query.category))]
    pub async fn fetch_products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let cache_key = CacheKey::Products(query.clone());

        if let Some(cache) = &self.inner.cache
            && let Some(CacheValue::Products(products)) = cache.get(&cache_key).await
        {
            debug!("Cache hit for product page");
            return Ok(products);
        }

        let body = self.execute(&self.inner.products_url, query).await?;
        let products = decode_products(&body)?;
        debug!(count = products.len(), "Fetched product page");

        if let Some(cache) = &self.inner.cache {
            cache
                .insert(cache_key, CacheValue::Products(products.clone()))
                .await;
        }

        Ok(products)
    }

    /// Drop every cached response.
    pub fn invalidate_cache(&self) {
        if let Some(cache) = &self.inner.cache {
            cache.invalidate_all();
        }
    }
}
