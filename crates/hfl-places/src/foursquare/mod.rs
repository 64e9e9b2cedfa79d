//! HTTP client for the Foursquare Places v3 API.
//!
//! Covers the two endpoints the locator needs: nearby search and per-venue
//! detail. Both authenticate with the raw API key in the `Authorization`
//! header.

pub mod types;

use hfl_core::config::{
    DEFAULT_PLACES_BASE_URL, DEFAULT_SEARCH_LIMIT, DEFAULT_SEARCH_QUERY, DEFAULT_SEARCH_RADIUS_M,
};
use hfl_core::{AppConfig, Coordinates, VenueCandidate, VenueDetail};
use reqwest::{Client, RequestBuilder, Url};

use crate::error::PlacesError;
use crate::http::{build_client, endpoint, parse_base_url, send_json};
use types::{PlaceDetailResponse, PlaceSearchResponse};

/// Detail fields requested per venue.
const DETAIL_FIELDS: &str = "photos,rating";

/// Fixed parameters of a nearby search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub query: String,
    pub limit: u32,
    /// Search radius in meters; `None` uses the service default.
    pub radius_m: Option<u32>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            query: DEFAULT_SEARCH_QUERY.to_owned(),
            limit: DEFAULT_SEARCH_LIMIT,
            radius_m: Some(DEFAULT_SEARCH_RADIUS_M),
        }
    }
}

impl SearchParams {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            query: config.search_query.clone(),
            limit: config.search_limit,
            radius_m: config.search_radius_m,
        }
    }
}

/// Client for Foursquare place search and place detail.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlacesClient {
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_PLACES_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` is not an http(s) URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            api_key: api_key.to_owned(),
            base_url: parse_base_url(base_url)?,
        })
    }

    /// # Errors
    ///
    /// Same as [`PlacesClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            &config.foursquare_api_key,
            config.request_timeout_secs,
            &config.user_agent,
            &config.places_base_url,
        )
    }

    /// Fetches the first page of venues near `coordinates`.
    ///
    /// Hits without an ID or a valid main geocode are dropped, so the result
    /// can be shorter than the raw `results` array; every later stage counts
    /// the mapped candidates only. There is no pagination: at most
    /// `params.limit` venues come back.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure or timeout.
    /// - [`PlacesError::UnexpectedStatus`] on any non-2xx status (e.g. 401 for
    ///   a bad key).
    /// - [`PlacesError::Deserialize`] if the response shape is unexpected.
    pub async fn search_places(
        &self,
        coordinates: &Coordinates,
        params: &SearchParams,
    ) -> Result<Vec<VenueCandidate>, PlacesError> {
        let url = self.search_url(coordinates, params);
        let response: PlaceSearchResponse = send_json(
            self.authorized(&url),
            &url,
            &format!("places search near {coordinates}"),
        )
        .await?;

        let total = response.results.len();
        let candidates: Vec<VenueCandidate> = response
            .results
            .into_iter()
            .filter_map(types::PlaceSummary::into_candidate)
            .collect();

        if candidates.len() < total {
            tracing::debug!(
                skipped = total - candidates.len(),
                total,
                "dropped search hits without id or geocode"
            );
        }
        Ok(candidates)
    }

    /// Fetches photos and rating for one venue.
    ///
    /// # Errors
    ///
    /// Same as [`PlacesClient::search_places`].
    pub async fn place_details(&self, venue_id: &str) -> Result<VenueDetail, PlacesError> {
        let url = self.detail_url(venue_id);
        let response: PlaceDetailResponse = send_json(
            self.authorized(&url),
            &url,
            &format!("place detail {venue_id}"),
        )
        .await?;
        Ok(response.into_detail(venue_id))
    }

    fn authorized(&self, url: &Url) -> RequestBuilder {
        self.client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .header(reqwest::header::AUTHORIZATION, &self.api_key)
    }

    fn search_url(&self, coordinates: &Coordinates, params: &SearchParams) -> Url {
        let mut url = endpoint(&self.base_url, &["places", "search"]);
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair(
                "ll",
                &format!("{},{}", coordinates.latitude(), coordinates.longitude()),
            );
            pairs.append_pair("query", &params.query);
            pairs.append_pair("limit", &params.limit.to_string());
            if let Some(radius) = params.radius_m {
                pairs.append_pair("radius", &radius.to_string());
            }
        }
        url
    }

    fn detail_url(&self, venue_id: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["places", venue_id]);
        url.query_pairs_mut().append_pair("fields", DETAIL_FIELDS);
        url
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
