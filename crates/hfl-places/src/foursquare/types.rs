//! Foursquare Places v3 response types.
//!
//! Only the fields the locator reads are modelled. Everything optional in the
//! provider payload stays optional here; mapping into the domain types decides
//! what is required.

use hfl_core::{Coordinates, PhotoRef, Rating, VenueCandidate, VenueDetail};
use serde::Deserialize;

/// `GET /places/search` response: `{ "results": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub struct PlaceSearchResponse {
    #[serde(default)]
    pub results: Vec<PlaceSummary>,
}

/// One search hit.
#[derive(Debug, Deserialize)]
pub struct PlaceSummary {
    #[serde(default)]
    pub fsq_id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub geocodes: Option<Geocodes>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub location: PlaceLocation,
}

#[derive(Debug, Deserialize)]
pub struct Geocodes {
    #[serde(default)]
    pub main: Option<LatLng>,
}

#[derive(Debug, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Deserialize)]
pub struct Category {
    pub name: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PlaceLocation {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub locality: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
}

/// `GET /places/{fsq_id}` response, restricted to `fields=photos,rating`.
#[derive(Debug, Deserialize)]
pub struct PlaceDetailResponse {
    #[serde(default)]
    pub photos: Vec<Photo>,
    /// 0–10 on Foursquare's scale.
    #[serde(default)]
    pub rating: Option<f64>,
}

/// A photo entry. `prefix` and `suffix` are optional so that one malformed
/// entry cannot fail the whole detail payload.
#[derive(Debug, Deserialize)]
pub struct Photo {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub suffix: Option<String>,
}

impl Photo {
    fn into_photo_ref(self) -> Option<PhotoRef> {
        Some(PhotoRef {
            id: self.id,
            prefix: non_blank(self.prefix)?,
            suffix: non_blank(self.suffix)?,
        })
    }
}

impl PlaceSummary {
    /// Maps a search hit to a [`VenueCandidate`].
    ///
    /// Returns `None` for hits without an ID or a usable main geocode; such a
    /// venue can be neither enriched nor placed on a map.
    #[must_use]
    pub fn into_candidate(self) -> Option<VenueCandidate> {
        let id = self.fsq_id.filter(|id| !id.trim().is_empty())?;
        let main = self.geocodes.and_then(|g| g.main)?;
        let coordinates = match Coordinates::new(main.latitude, main.longitude) {
            Ok(c) => c,
            Err(e) => {
                tracing::debug!(venue_id = %id, error = %e, "skipping place with invalid geocode");
                return None;
            }
        };

        Some(VenueCandidate {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            coordinates,
            categories: self.categories.into_iter().map(|c| c.name).collect(),
            address: non_blank(self.location.address),
            locality: non_blank(self.location.locality),
            formatted_address: non_blank(self.location.formatted_address),
        })
    }
}

impl PlaceDetailResponse {
    /// Maps the detail payload to a [`VenueDetail`].
    ///
    /// A rating outside the 0–10 scale is dropped rather than clamped.
    /// Photos missing a prefix or suffix are skipped; the rest keep their order.
    #[must_use]
    pub fn into_detail(self, venue_id: &str) -> VenueDetail {
        let rating = self.rating.and_then(|raw| match Rating::new(raw) {
            Ok(r) => Some(r),
            Err(e) => {
                tracing::debug!(venue_id, error = %e, "dropping out-of-range rating");
                None
            }
        });

        let total = self.photos.len();
        let photos: Vec<PhotoRef> = self
            .photos
            .into_iter()
            .filter_map(Photo::into_photo_ref)
            .collect();
        if photos.len() < total {
            tracing::debug!(
                venue_id,
                skipped = total - photos.len(),
                "skipping incomplete photo entries"
            );
        }

        VenueDetail { photos, rating }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
