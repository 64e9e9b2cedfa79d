//! Map view model and the renderer contract.
//!
//! The renderer is an external collaborator; this module only decides what
//! it is asked to draw.

use hfl_core::Coordinates;
use serde::Serialize;

use crate::state::SearchState;

pub const DEFAULT_ZOOM: u8 = 13;
pub const USER_LOCATION_LABEL: &str = "Your Location";
pub const OSM_TILE_URL_TEMPLATE: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "© OpenStreetMap contributors";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    UserLocation,
    Venue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapMarker {
    /// Stable key: the venue ID, or `"user"` for the location marker.
    pub key: String,
    pub kind: MarkerKind,
    pub position: Coordinates,
    pub label: String,
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub center: Coordinates,
    pub zoom: u8,
    /// User location first, then venues in list order.
    pub markers: Vec<MapMarker>,
}

impl MapView {
    /// Builds the view for `state`, or `None` while there is nothing to center on.
    #[must_use]
    pub fn from_state(state: &SearchState) -> Option<Self> {
        let center = state.coordinates?;

        let mut markers = Vec::with_capacity(state.venues.len() + 1);
        markers.push(MapMarker {
            key: "user".to_owned(),
            kind: MarkerKind::UserLocation,
            position: center,
            label: USER_LOCATION_LABEL.to_owned(),
        });
        markers.extend(state.venues.iter().map(|venue| MapMarker {
            key: venue.id().to_owned(),
            kind: MarkerKind::Venue,
            position: venue.candidate.coordinates,
            label: venue.name().to_owned(),
        }));

        Some(Self {
            center,
            zoom: DEFAULT_ZOOM,
            markers,
        })
    }

    /// `true` when a renderer showing `previous` has to move its viewport.
    #[must_use]
    pub fn recenters_from(&self, previous: Option<&MapView>) -> bool {
        previous.map_or(true, |p| p.center != self.center || p.zoom != self.zoom)
    }

    pub fn venue_markers(&self) -> impl Iterator<Item = &MapMarker> {
        self.markers
            .iter()
            .filter(|m| m.kind == MarkerKind::Venue)
    }
}

/// Draws a [`MapView`]: base map, user marker, one marker per venue.
pub trait MapRenderer {
    fn render(&mut self, view: &MapView);
}
