//! Nominatim geocoding client.
//!
//! Resolves a free-text place name to [`Coordinates`]. Only the first match
//! is ever used; there is no disambiguation step.

use hfl_core::config::DEFAULT_GEOCODER_BASE_URL;
use hfl_core::{AppConfig, Coordinates, CoreError};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::PlacesError;
use crate::http::{build_client, endpoint, parse_base_url, send_json};

/// One element of the Nominatim `/search` response array.
#[derive(Debug, Deserialize)]
pub struct GeocodeMatch {
    pub lat: CoordinateValue,
    pub lon: CoordinateValue,
    #[serde(default)]
    pub display_name: Option<String>,
}

/// Nominatim encodes coordinates as strings; some compatible servers send
/// plain numbers instead.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CoordinateValue {
    Text(String),
    Number(f64),
}

impl CoordinateValue {
    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Text(s) => s.trim().parse::<f64>().ok(),
            Self::Number(n) => Some(*n),
        }
    }
}

impl GeocodeMatch {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinates`] if either value does not
    /// parse or lies outside the valid range.
    pub fn coordinates(&self) -> Result<Coordinates, CoreError> {
        match (self.lat.as_f64(), self.lon.as_f64()) {
            (Some(latitude), Some(longitude)) => Coordinates::new(latitude, longitude),
            (lat, lon) => Err(CoreError::InvalidCoordinates {
                latitude: lat.unwrap_or(f64::NAN),
                longitude: lon.unwrap_or(f64::NAN),
            }),
        }
    }
}

/// Client for a Nominatim-compatible `/search` endpoint.
///
/// Nominatim's usage policy requires an identifying `User-Agent`; pass a
/// descriptive one to [`GeocoderClient::new`].
pub struct GeocoderClient {
    client: Client,
    base_url: Url,
}

impl GeocoderClient {
    /// Creates a client pointed at the public Nominatim instance.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_GEOCODER_BASE_URL)
    }

    /// Creates a client with a custom base URL (for self-hosted instances or
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` is not an http(s) URL.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        Ok(Self {
            client: build_client(timeout_secs, user_agent)?,
            base_url: parse_base_url(base_url)?,
        })
    }

    /// # Errors
    ///
    /// Same as [`GeocoderClient::with_base_url`].
    pub fn from_config(config: &AppConfig) -> Result<Self, PlacesError> {
        Self::with_base_url(
            config.request_timeout_secs,
            &config.user_agent,
            &config.geocoder_base_url,
        )
    }

    /// Resolves `place_name` to the coordinates of the first match.
    ///
    /// The caller is expected to have rejected blank input already.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::NoMatch`] when the service returns zero matches.
    /// - [`PlacesError::InvalidCoordinates`] when the first match carries
    ///   unusable coordinates.
    /// - [`PlacesError::Http`], [`PlacesError::UnexpectedStatus`], or
    ///   [`PlacesError::Deserialize`] on transport or protocol failure.
    pub async fn resolve(&self, place_name: &str) -> Result<Coordinates, PlacesError> {
        let url = self.search_url(place_name);
        let matches: Vec<GeocodeMatch> = send_json(
            self.client.get(url.clone()),
            &url,
            &format!("geocode(q={place_name})"),
        )
        .await?;

        let Some(first) = matches.first() else {
            return Err(PlacesError::NoMatch {
                query: place_name.to_owned(),
            });
        };

        let coordinates = first.coordinates()?;
        tracing::debug!(
            place = place_name,
            display_name = first.display_name.as_deref().unwrap_or(""),
            %coordinates,
            candidates = matches.len(),
            "geocoded place"
        );
        Ok(coordinates)
    }

    fn search_url(&self, place_name: &str) -> Url {
        let mut url = endpoint(&self.base_url, &["search"]);
        url.query_pairs_mut()
            .append_pair("format", "json")
            .append_pair("limit", "1")
            .append_pair("q", place_name);
        url
    }
}
