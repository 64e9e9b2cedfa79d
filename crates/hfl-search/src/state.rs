//! The single search state value and its transitions.
//!
//! Only the orchestrator calls the transition methods; everyone else gets a
//! read-only snapshot or a `watch` receiver.

use chrono::{DateTime, Utc};
use hfl_core::{Coordinates, EnrichedVenue};
use serde::Serialize;

use crate::error::SearchError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchPhase {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
}

/// Snapshot of the locator's search.
///
/// `venues` is only ever non-empty alongside `coordinates`, and is empty for
/// the whole `Loading` phase.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SearchState {
    /// Incremented by every search; identifies the cycle that owns the state.
    pub generation: u64,
    pub phase: SearchPhase,
    /// Trimmed place name of the current cycle.
    pub place_name: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub venues: Vec<EnrichedVenue>,
    pub error: Option<SearchError>,
    /// When the last cycle reached `Success`.
    pub completed_at: Option<DateTime<Utc>>,
}

impl SearchState {
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    /// Starts a new cycle for `place` and returns its generation.
    ///
    /// Previous results are cleared before any request is made.
    pub(crate) fn begin(&mut self, place: &str) -> u64 {
        self.generation += 1;
        self.phase = SearchPhase::Loading;
        self.place_name = Some(place.to_owned());
        self.clear_results();
        self.generation
    }

    /// Starts and immediately ends a cycle for blank input.
    pub(crate) fn reject_blank_input(&mut self) -> u64 {
        self.generation += 1;
        self.place_name = None;
        self.clear_results();
        self.phase = SearchPhase::Error;
        self.error = Some(SearchError::InputInvalid);
        self.generation
    }

    /// Geocoding finished; the map can center while places load.
    pub(crate) fn locate(&mut self, coordinates: Coordinates) {
        self.coordinates = Some(coordinates);
    }

    pub(crate) fn succeed(&mut self, venues: Vec<EnrichedVenue>, at: DateTime<Utc>) {
        debug_assert!(
            venues.is_empty() || self.coordinates.is_some(),
            "venues without coordinates"
        );
        self.phase = SearchPhase::Success;
        self.venues = venues;
        self.error = None;
        self.completed_at = Some(at);
    }

    pub(crate) fn fail(&mut self, error: SearchError) {
        self.phase = SearchPhase::Error;
        self.clear_results();
        self.error = Some(error);
    }

    fn clear_results(&mut self) {
        self.coordinates = None;
        self.venues.clear();
        self.error = None;
        self.completed_at = None;
    }
}
