//! Venue domain types shared by the places clients and the search orchestrator.
//!
//! Everything here is created once per search cycle and then only read.
//! Raw provider payloads are mapped into these types at the client boundary.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Lower bound of the venue rating scale.
pub const RATING_MIN: f64 = 0.0;
/// Upper bound of the venue rating scale (Foursquare rates venues 0–10).
pub const RATING_MAX: f64 = 10.0;

/// A validated WGS84 position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinates")]
pub struct Coordinates {
    latitude: f64,
    longitude: f64,
}

impl Coordinates {
    /// Builds a coordinate pair, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinates`] unless latitude is within
    /// `[-90, 90]` and longitude within `[-180, 180]`.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);
        if !valid {
            return Err(CoreError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinates> for Coordinates {
    type Error = CoreError;

    fn try_from(raw: RawCoordinates) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl std::fmt::Display for Coordinates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.6},{:.6}", self.latitude, self.longitude)
    }
}

/// A raw search result before enrichment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VenueCandidate {
    /// Provider venue ID (Foursquare `fsq_id`). Unique within one search batch.
    pub id: String,
    pub name: String,
    pub coordinates: Coordinates,
    /// Category display names, e.g. `"Salad Restaurant"`.
    pub categories: Vec<String>,
    /// Street address line, if the provider returned one.
    pub address: Option<String>,
    pub locality: Option<String>,
    pub formatted_address: Option<String>,
}

impl VenueCandidate {
    /// Best available single-line address: street line, then the formatted
    /// address, then the locality.
    #[must_use]
    pub fn display_address(&self) -> Option<&str> {
        self.address
            .as_deref()
            .or(self.formatted_address.as_deref())
            .or(self.locality.as_deref())
            .filter(|s| !s.trim().is_empty())
    }
}

/// A provider photo reference.
///
/// Foursquare splits photo URLs around a size token, so `prefix` and `suffix`
/// are stored verbatim and any size can be substituted later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub id: Option<String>,
    /// URL fragment before the size token, e.g. `"https://fastly.4sqi.net/img/general/"`.
    pub prefix: String,
    /// URL fragment after the size token, e.g. `"/123_abc.jpg"`.
    pub suffix: String,
}

impl PhotoRef {
    /// `prefix + "{width}x{height}" + suffix`.
    #[must_use]
    pub fn url(&self, width: u32, height: u32) -> String {
        format!("{}{width}x{height}{}", self.prefix, self.suffix)
    }

    /// URL of the unscaled upload.
    #[must_use]
    pub fn original_url(&self) -> String {
        format!("{}original{}", self.prefix, self.suffix)
    }
}

/// A venue rating on the `RATING_MIN..=RATING_MAX` scale, passed through
/// from the provider without rescaling.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct Rating(f64);

impl TryFrom<f64> for Rating {
    type Error = CoreError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Rating> for f64 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

impl Rating {
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRating`] for NaN, infinities, or values
    /// outside the scale.
    pub fn new(value: f64) -> Result<Self, CoreError> {
        if value.is_finite() && (RATING_MIN..=RATING_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(CoreError::InvalidRating(value))
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Whole stars out of five, rounded to nearest.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn stars(self) -> u8 {
        (self.0 / 2.0).round() as u8
    }
}

/// Supplementary detail fetched per venue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VenueDetail {
    /// Photos in provider order; the first is the primary photo.
    pub photos: Vec<PhotoRef>,
    pub rating: Option<Rating>,
}

/// A display-ready venue: candidate fields plus detail fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedVenue {
    #[serde(flatten)]
    pub candidate: VenueCandidate,
    pub photos: Vec<PhotoRef>,
    pub rating: Option<Rating>,
    /// `false` when the detail request failed and the defaults were used.
    pub detail_fetched: bool,
}

impl EnrichedVenue {
    #[must_use]
    pub fn new(candidate: VenueCandidate, detail: VenueDetail) -> Self {
        Self {
            candidate,
            photos: detail.photos,
            rating: detail.rating,
            detail_fetched: true,
        }
    }

    /// Wraps a candidate whose detail request failed.
    #[must_use]
    pub fn without_detail(candidate: VenueCandidate) -> Self {
        let detail = VenueDetail::default();
        Self {
            candidate,
            photos: detail.photos,
            rating: detail.rating,
            detail_fetched: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.candidate.id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.candidate.name
    }

    #[must_use]
    pub fn primary_photo_url(&self, width: u32, height: u32) -> Option<String> {
        self.photos.first().map(|p| p.url(width, height))
    }
}
