//! Reducer for the catalog state machine.

use wardrobe_core::Category;

use super::intent::CatalogIntent;
use super::state::CatalogState;
use crate::mvi::Reducer;

/// Reducer for catalog state transitions.
///
/// Pure function: HTTP calls and observer notifications happen in the
/// controller around the dispatch call.
pub struct CatalogReducer;

impl Reducer for CatalogReducer {
    type State = CatalogState;
    type Intent = CatalogIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CatalogIntent::CategoriesLoaded(loaded) => {
                let mut categories = Vec::with_capacity(loaded.len() + 1);
                categories.push(Category::all());
                categories.extend(loaded);
                CatalogState {
                    categories,
                    selected_category_url: String::new(),
                    ..state
                }
            }

            CatalogIntent::CategorySelected(url) => CatalogState {
                selected_category_url: url,
                ..state
            },

            CatalogIntent::ResetProducts => CatalogState {
                products: Vec::new(),
                current_page: 1,
                has_more: true,
                is_loading: false,
                in_flight: None,
                generation: state.generation.wrapping_add(1),
                ..state
            },

            CatalogIntent::PageRequested(request) => {
                if !state.can_load_more() || request != state.next_request() {
                    return state;
                }
                CatalogState {
                    is_loading: true,
                    in_flight: Some(request),
                    ..state
                }
            }

            CatalogIntent::PageLoaded {
                request,
                products,
                page_size,
            } => {
                if !state.is_current(&request) {
                    return state;
                }
                let short_page = products.len() < usize::try_from(page_size).unwrap_or(usize::MAX);
                let mut all = state.products;
                all.extend(products);
                CatalogState {
                    products: all,
                    current_page: state.current_page.saturating_add(1),
                    has_more: state.has_more && !short_page,
                    is_loading: false,
                    in_flight: None,
                    ..state
                }
            }

            CatalogIntent::PageFailed { request } | CatalogIntent::PageAbandoned { request } => {
                if !state.is_current(&request) {
                    return state;
                }
                CatalogState {
                    is_loading: false,
                    in_flight: None,
                    ..state
                }
            }
        }
    }
}
