//! Clients for the external services behind the locator: a Nominatim
//! geocoder and the Foursquare Places API, plus the detail enrichment
//! fan-out built on top of the latter.

pub mod enrich;
pub mod error;
pub mod foursquare;
pub mod geocode;
mod http;

pub use enrich::enrich_venues;
pub use error::PlacesError;
pub use foursquare::{PlacesClient, SearchParams};
pub use geocode::GeocoderClient;
