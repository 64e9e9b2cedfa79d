//! Search orchestration for the healthy food locator.
//!
//! [`SearchOrchestrator`] sequences geocoding, nearby search, and detail
//! enrichment, and publishes the outcome as a single [`SearchState`].
//! [`map::MapView`] derives what a map renderer should draw from that state.

pub mod error;
pub mod map;
pub mod orchestrator;
pub mod state;

pub use error::SearchError;
pub use map::{MapMarker, MapRenderer, MapView, MarkerKind};
pub use orchestrator::{SearchOptions, SearchOrchestrator};
pub use state::{SearchPhase, SearchState};
