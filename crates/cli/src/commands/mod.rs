//! Command implementations and the state they share.

pub mod cart;
pub mod catalog;

use std::sync::Arc;

use wardrobe_storefront::StorefrontError;
use wardrobe_storefront::cart::{CartError, CartObserver, CartStore};
use wardrobe_storefront::catalog::{CatalogController, CatalogObserver};
use wardrobe_storefront::config::ShopConfig;
use wardrobe_storefront::persistence::FileStore;
use wardrobe_storefront::shop::{ApiError, ShopApiClient};

/// Configuration plus constructors for the controller and cart.
pub struct Context {
    config: ShopConfig,
}

impl Context {
    /// Load configuration from the environment (and `.env`).
    pub fn load() -> Result<Self, StorefrontError> {
        let config = ShopConfig::from_env()?;
        tracing::debug!(?config, "Loaded configuration");
        Ok(Self { config })
    }

    /// A catalog controller talking to the configured API.
    pub fn catalog(&self) -> Result<CatalogController, StorefrontError> {
        let api = ShopApiClient::new(self.config.api.clone())?;
        Ok(CatalogController::new(api).with_observer(Arc::new(LogObserver)))
    }

    /// The persisted cart, loaded.
    pub fn cart(&self) -> CartStore {
        let store = FileStore::new(self.config.cart.data_dir.clone());
        tracing::debug!(dir = %store.dir().display(), "Opening cart");
        let mut cart = CartStore::with_key(Arc::new(store), self.config.cart.storage_key.clone())
            .with_observer(Arc::new(LogObserver));
        cart.load();
        cart
    }
}

/// Sends controller and cart notifications to the log.
struct LogObserver;

impl CatalogObserver for LogObserver {
    fn on_error(&self, error: &ApiError) {
        tracing::warn!(error = %error, retryable = error.is_retryable(), "Catalog fetch failed");
    }
}

impl CartObserver for LogObserver {
    fn on_persist_error(&self, error: &CartError) {
        tracing::warn!(error = %error, "Cart change was not saved");
    }

    fn on_load_reset(&self, reason: &str) {
        tracing::warn!(reason, "Saved cart was unreadable; starting with an empty cart");
    }
}
