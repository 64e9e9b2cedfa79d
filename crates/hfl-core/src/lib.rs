pub mod app_config;
pub mod config;
pub mod types;

pub use app_config::{AppConfig, Environment};
pub use config::{load_app_config, load_app_config_from_env};
pub use types::{
    Coordinates, EnrichedVenue, PhotoRef, Rating, VenueCandidate, VenueDetail, RATING_MAX,
    RATING_MIN,
};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    #[error("coordinates out of range: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinates { latitude: f64, longitude: f64 },

    #[error("rating {0} is outside {RATING_MIN}..={RATING_MAX}")]
    InvalidRating(f64),
}
