use hfl_core::CoreError;
use thiserror::Error;

/// Errors returned by the geocoding and places clients.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network, TLS, or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// The geocoder answered but had no candidate for the query.
    #[error("no geocoding match for \"{query}\"")]
    NoMatch { query: String },

    /// The service returned coordinates that are unparsable or off the globe.
    #[error("invalid coordinates in response: {0}")]
    InvalidCoordinates(#[from] CoreError),
}

impl PlacesError {
    /// `true` when the service was reachable and simply had nothing for the query.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}
