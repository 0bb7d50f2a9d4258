//! Integration tests for the wardrobe storefront.
//!
//! # Running Tests
//!
//! ```bash
//! # Scripted flows (no network)
//! cargo test -p wardrobe-integration-tests
//!
//! # Include the live API smoke test
//! SHOP_API_BASE_URL=https://... cargo test -p wardrobe-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `catalog_flow` - Controller and API client over a scripted transport
//! - `cart_persistence` - Cart store over the file backend
//! - `live_api` - Read-only requests against a real shop API (ignored by default)

use std::sync::Arc;

use tempfile::TempDir;
use wardrobe_storefront::cart::CartStore;
use wardrobe_storefront::catalog::CatalogController;
use wardrobe_storefront::persistence::FileStore;
use wardrobe_storefront::shop::ShopApiClient;
use wardrobe_storefront::testing::{ScriptedTransport, test_config};

/// A controller over a scripted transport and a cart in a temp directory.
pub struct TestContext {
    pub transport: Arc<ScriptedTransport>,
    pub controller: CatalogController,
    pub data_dir: TempDir,
}

impl TestContext {
    /// # Panics
    ///
    /// Panics if the temp directory cannot be created.
    #[must_use]
    pub fn new() -> Self {
        let transport = Arc::new(ScriptedTransport::new());
        let api = ShopApiClient::with_transport(test_config(), transport.clone())
            .expect("test config has valid endpoints");
        Self {
            transport,
            controller: CatalogController::new(api),
            data_dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// A freshly loaded cart over the context's data directory.
    ///
    /// Every call sees what earlier carts saved, like separate app runs.
    #[must_use]
    pub fn cart(&self) -> CartStore {
        let mut cart = CartStore::new(Arc::new(FileStore::new(self.data_dir.path())));
        cart.load();
        cart
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
