//! Catalog fetch controller.
//!
//! Category selection and incremental product loading, modelled as a state
//! machine:
//!
//! - [`CatalogState`] - categories, loaded products, pagination flags
//! - [`CatalogIntent`] - everything that can happen to that state
//! - [`CatalogReducer`] - the pure transition function
//! - [`CatalogController`] - performs the HTTP calls and dispatches intents
//!
//! Every page fetch is tagged with a [`PageRequest`]. Completions whose tag no
//! longer matches the in-flight request (because the category changed in the
//! meantime) are discarded.

mod controller;
mod intent;
mod reducer;
mod state;

pub use controller::{CatalogController, CatalogObserver, FetchOutcome};
pub use intent::CatalogIntent;
pub use reducer::CatalogReducer;
pub use state::{CatalogState, PageRequest};
