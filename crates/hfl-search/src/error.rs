use hfl_places::PlacesError;
use serde::Serialize;
use thiserror::Error;

/// Why a search cycle ended in the `Error` phase.
///
/// The `Display` text is the short user-facing message. Enrichment failures
/// are not represented here: they are absorbed per venue.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SearchError {
    /// Blank or whitespace-only place name.
    #[error("Please enter a location name.")]
    InputInvalid,

    #[error("Location not found.")]
    NotFound { place: String },

    /// Transport, auth, or protocol failure from an external service.
    #[error("Failed to fetch location or places.")]
    ServiceUnavailable { reason: String },
}

impl SearchError {
    /// Classifies a geocoder failure for `place`.
    #[must_use]
    pub fn from_geocode(place: &str, err: &PlacesError) -> Self {
        if err.is_not_found() {
            Self::NotFound {
                place: place.to_owned(),
            }
        } else {
            Self::ServiceUnavailable {
                reason: err.to_string(),
            }
        }
    }
}
