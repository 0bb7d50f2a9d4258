//! Model-View-Intent primitives.
//!
//! ```text
//! Intent ──→ Reducer ──→ State ──→ View
//!    ↑                              │
//!    └──────────────────────────────┘
//! ```
//!
//! - **State**: immutable snapshot of everything a view needs
//! - **Intent**: user action or system event (API response, timer)
//! - **Reducer**: pure function `(State, Intent) -> State`

/// Marker trait for state objects.
///
/// States are cloned to create new states and compared to detect changes.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}

/// Marker trait for intent objects.
pub trait Intent: Send + 'static {}

/// Transforms state based on intents.
///
/// The reducer is the only place where state transitions happen. It must be
/// a pure function; side effects are performed by the caller around dispatch.
pub trait Reducer {
    /// The state type this reducer operates on.
    type State: UiState;

    /// The intent type this reducer handles.
    type Intent: Intent;

    /// Process an intent and return the new state.
    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State;
}
