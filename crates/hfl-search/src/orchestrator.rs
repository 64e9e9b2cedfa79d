//! Search orchestration: geocode, then search, then enrich.
//!
//! Each call to [`SearchOrchestrator::search`] starts a new cycle with a fresh
//! generation number. Every write back into the shared state first checks
//! that the cycle's generation is still current, so a slow, superseded cycle
//! can never overwrite a newer one. Last search wins.

use chrono::Utc;
use hfl_core::config::{DEFAULT_ENRICH_MAX_CONCURRENT, DEFAULT_PLACE};
use hfl_core::AppConfig;
use hfl_places::{enrich_venues, GeocoderClient, PlacesClient, PlacesError, SearchParams};
use tokio::sync::watch;

use crate::error::SearchError;
use crate::state::SearchState;

/// Tunables that stay fixed for the orchestrator's lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub params: SearchParams,
    /// Place searched by [`SearchOrchestrator::initialize`].
    pub default_place: String,
    pub enrich_max_concurrent: usize,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            params: SearchParams::default(),
            default_place: DEFAULT_PLACE.to_owned(),
            enrich_max_concurrent: DEFAULT_ENRICH_MAX_CONCURRENT,
        }
    }
}

impl SearchOptions {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            params: SearchParams::from_config(config),
            default_place: config.default_place.clone(),
            enrich_max_concurrent: config.enrich_max_concurrent,
        }
    }
}

/// Owns the [`SearchState`] and is its only writer.
///
/// Readers call [`SearchOrchestrator::state`] for a snapshot or
/// [`SearchOrchestrator::subscribe`] to follow transitions.
pub struct SearchOrchestrator {
    geocoder: GeocoderClient,
    places: PlacesClient,
    options: SearchOptions,
    state: watch::Sender<SearchState>,
}

impl SearchOrchestrator {
    #[must_use]
    pub fn new(geocoder: GeocoderClient, places: PlacesClient, options: SearchOptions) -> Self {
        let (state, _) = watch::channel(SearchState::default());
        Self {
            geocoder,
            places,
            options,
            state,
        }
    }

    /// Builds both clients and the options from application config.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError`] if either HTTP client cannot be constructed or a
    /// configured base URL is invalid.
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Ok(Self::new(
            GeocoderClient::from_config(config)?,
            PlacesClient::from_config(config)?,
            SearchOptions::from_config(config),
        ))
    }

    #[must_use]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    #[must_use]
    pub fn state(&self) -> SearchState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<SearchState> {
        self.state.subscribe()
    }

    /// Runs the implicit first search against the configured default place.
    pub async fn initialize(&self) -> SearchState {
        let place = self.options.default_place.clone();
        tracing::debug!(place = %place, "running initial search");
        self.search(&place).await
    }

    /// Runs one full search cycle for `place_name`.
    ///
    /// Never fails: every outcome is a terminal [`SearchState`]. Returns the
    /// state this cycle settled into, or the current state when a newer
    /// search superseded it.
    pub async fn search(&self, place_name: &str) -> SearchState {
        let place = place_name.trim();

        if place.is_empty() {
            let mut generation = 0;
            self.state.send_modify(|state| {
                generation = state.reject_blank_input();
            });
            tracing::debug!(generation, "rejected blank place name");
            return self.state();
        }

        let mut generation = 0;
        self.state.send_modify(|state| {
            generation = state.begin(place);
        });
        tracing::info!(generation, place, "search started");

        let coordinates = match self.geocoder.resolve(place).await {
            Ok(coordinates) => coordinates,
            Err(e) => {
                let error = SearchError::from_geocode(place, &e);
                tracing::warn!(generation, place, error = %e, "geocoding failed");
                return self.settle(generation, |state| state.fail(error));
            }
        };

        if self
            .commit(generation, |state| state.locate(coordinates))
            .is_none()
        {
            return self.superseded(generation);
        }

        // A failed places search is reported as "no venues", not as an error.
        let candidates = match self
            .places
            .search_places(&coordinates, &self.options.params)
            .await
        {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(
                    generation,
                    place,
                    error = %e,
                    "places search failed; showing no venues"
                );
                Vec::new()
            }
        };

        if candidates.is_empty() {
            tracing::info!(generation, place, "no venues found");
            return self.settle(generation, |state| state.succeed(Vec::new(), Utc::now()));
        }

        if !self.is_current(generation) {
            return self.superseded(generation);
        }

        let venues = enrich_venues(
            &self.places,
            candidates,
            self.options.enrich_max_concurrent,
        )
        .await;

        let count = venues.len();
        let settled = self.settle(generation, |state| state.succeed(venues, Utc::now()));
        if settled.generation == generation {
            tracing::info!(generation, place, venues = count, "search complete");
        }
        settled
    }

    fn is_current(&self, generation: u64) -> bool {
        self.state.borrow().generation == generation
    }

    /// Applies `transition` only if `generation` still owns the state, and
    /// returns the resulting snapshot.
    fn commit<F>(&self, generation: u64, transition: F) -> Option<SearchState>
    where
        F: FnOnce(&mut SearchState),
    {
        let mut snapshot = None;
        self.state.send_if_modified(|state| {
            if state.generation != generation {
                return false;
            }
            transition(state);
            snapshot = Some(state.clone());
            true
        });
        snapshot
    }

    fn settle<F>(&self, generation: u64, transition: F) -> SearchState
    where
        F: FnOnce(&mut SearchState),
    {
        self.commit(generation, transition)
            .unwrap_or_else(|| self.superseded(generation))
    }

    fn superseded(&self, generation: u64) -> SearchState {
        let current = self.state();
        tracing::debug!(
            generation,
            current = current.generation,
            "discarding results of superseded search"
        );
        current
    }
}
