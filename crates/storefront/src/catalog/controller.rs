//! Catalog fetch controller.
//!
//! Runs the side effects (HTTP through [`ShopApiClient`], observer callbacks)
//! around reducer dispatch and publishes each new state on a watch channel.

use std::sync::Arc;

use scopeguard::ScopeGuard;
use tokio::sync::watch;
use tracing::{debug, instrument, warn};

use wardrobe_core::Product;

use super::intent::CatalogIntent;
use super::reducer::CatalogReducer;
use super::state::{CatalogState, PageRequest};
use crate::mvi::Reducer;
use crate::shop::{ApiError, ShopApiClient};

/// Receives fetch errors for display.
pub trait CatalogObserver: Send + Sync {
    fn on_error(&self, error: &ApiError);
}

/// What a product fetch did to the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// A page was appended.
    Loaded { count: usize },
    /// Nothing to do: a fetch is running or the list is exhausted.
    Skipped,
    /// The response belonged to an abandoned request and was dropped.
    Discarded,
}

/// Drives category and paginated product loading.
pub struct CatalogController {
    api: ShopApiClient,
    state: watch::Sender<CatalogState>,
    observer: Option<Arc<dyn CatalogObserver>>,
}

impl CatalogController {
    #[must_use]
    pub fn new(api: ShopApiClient) -> Self {
        Self {
            api,
            state: watch::Sender::new(CatalogState::default()),
            observer: None,
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn CatalogObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn state(&self) -> CatalogState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<CatalogState> {
        self.state.subscribe()
    }

    /// Load the category menu, then the first page of "All".
    ///
    /// On failure the categories stay as they were and no product fetch runs.
    ///
    /// # Errors
    ///
    /// Returns the API error, after reporting it to the observer.
    #[instrument(skip(self))]
    pub async fn fetch_categories(&self) -> Result<FetchOutcome, ApiError> {
        match self.api.fetch_categories().await {
            Ok(categories) => {
                dispatch(&self.state, CatalogIntent::CategoriesLoaded(categories));
                self.fetch_products(true).await
            }
            Err(e) => {
                warn!(error = %e, "Failed to load categories");
                self.report(&e);
                Err(e)
            }
        }
    }

    /// Fetch the next product page, starting over first if `reset` is set.
    ///
    /// If the returned future is dropped mid-request the loading flag is
    /// released and the page stays where it was.
    ///
    /// # Errors
    ///
    /// Returns the API error, after reporting it to the observer.
    #[instrument(skip(self))]
    pub async fn fetch_products(&self, reset: bool) -> Result<FetchOutcome, ApiError> {
        let Some(request) = self.begin_fetch(reset) else {
            return Ok(FetchOutcome::Skipped);
        };

        let query = self.api.product_query(&request.category_url, request.page);
        let abandoned = request.clone();
        let guard = scopeguard::guard(&self.state, move |state| {
            debug!(page = abandoned.page, "Product fetch abandoned");
            dispatch(state, CatalogIntent::PageAbandoned { request: abandoned });
        });

        let result = self.api.fetch_products(&query).await;
        ScopeGuard::into_inner(guard);

        self.complete_fetch(request, result)
    }

    /// Fetch the next page of the current category.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_products`].
    pub async fn load_more(&self) -> Result<FetchOutcome, ApiError> {
        self.fetch_products(false).await
    }

    /// Switch the category filter and reload from page 1.
    ///
    /// # Errors
    ///
    /// See [`Self::fetch_products`].
    pub async fn select_category(
        &self,
        category_url: impl Into<String>,
    ) -> Result<FetchOutcome, ApiError> {
        dispatch(
            &self.state,
            CatalogIntent::CategorySelected(category_url.into()),
        );
        self.fetch_products(true).await
    }

    /// Mark a page fetch as started and return its request tag.
    ///
    /// Returns `None` when a fetch is already running or the list is
    /// exhausted. Pair with [`Self::complete_fetch`] when the network call
    /// runs elsewhere.
    pub fn begin_fetch(&self, reset: bool) -> Option<PageRequest> {
        if reset {
            dispatch(&self.state, CatalogIntent::ResetProducts);
        }

        let request = self.state.borrow().next_request();
        dispatch(&self.state, CatalogIntent::PageRequested(request.clone()));

        if self.state.borrow().is_current(&request) {
            Some(request)
        } else {
            debug!("Product fetch skipped");
            None
        }
    }

    /// Apply the result of a fetch started with [`Self::begin_fetch`].
    ///
    /// Results for a request that is no longer in flight are dropped, errors
    /// included.
    ///
    /// # Errors
    ///
    /// Returns the API error of a current request, after reporting it.
    pub fn complete_fetch(
        &self,
        request: PageRequest,
        result: Result<Vec<Product>, ApiError>,
    ) -> Result<FetchOutcome, ApiError> {
        if !self.state.borrow().is_current(&request) {
            debug!(page = request.page, "Discarding stale product page");
            return Ok(FetchOutcome::Discarded);
        }

        match result {
            Ok(products) => {
                let count = products.len();
                dispatch(
                    &self.state,
                    CatalogIntent::PageLoaded {
                        request,
                        products,
                        page_size: self.api.page_size(),
                    },
                );
                Ok(FetchOutcome::Loaded { count })
            }
            Err(e) => {
                warn!(page = request.page, error = %e, "Failed to load product page");
                dispatch(&self.state, CatalogIntent::PageFailed { request });
                self.report(&e);
                Err(e)
            }
        }
    }

    fn report(&self, error: &ApiError) {
        if let Some(observer) = &self.observer {
            observer.on_error(error);
        }
    }
}

/// Reduce and publish, notifying subscribers only on change.
fn dispatch(state: &watch::Sender<CatalogState>, intent: CatalogIntent) {
    state.send_if_modified(|current| {
        let next = CatalogReducer::reduce(current.clone(), intent);
        if next == *current {
            false
        } else {
            *current = next;
            true
        }
    });
}
