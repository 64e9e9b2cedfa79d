use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

pub const DEFAULT_GEOCODER_BASE_URL: &str = "https://nominatim.openstreetmap.org";
pub const DEFAULT_PLACES_BASE_URL: &str = "https://api.foursquare.com/v3";
pub const DEFAULT_USER_AGENT: &str =
    "HealthyFoodLocator/1.0 (+https://github.com/healthy-food-locator)";
pub const DEFAULT_PLACE: &str = "Sukabumi, Indonesia";
pub const DEFAULT_SEARCH_QUERY: &str = "healthy food";
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;
pub const DEFAULT_SEARCH_RADIUS_M: u32 = 2000;
/// Equal to the largest search page, so every detail request can be in flight.
pub const DEFAULT_ENRICH_MAX_CONCURRENT: usize = 50;

/// Largest page the places search endpoint accepts.
const MAX_SEARCH_LIMIT: u32 = 50;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if required env vars are missing or values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so tests can drive it with a plain
/// `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let require = |var: &str| -> Result<String, ConfigError> {
        lookup(var)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar(var.to_string()))
    };

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let invalid = |var: &str, reason: String| ConfigError::InvalidEnvVar {
        var: var.to_string(),
        reason,
    };

    let parse_u32 = |var: &str, default: &str| -> Result<u32, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u32>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<u64>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.trim()
            .parse::<usize>()
            .map_err(|e| invalid(var, e.to_string()))
    };

    let foursquare_api_key = require("FOURSQUARE_API_KEY")?;

    let env = parse_environment(&or_default("HFL_ENV", "development"))?;
    let log_level = or_default("HFL_LOG_LEVEL", "info");

    let geocoder_base_url = or_default("HFL_GEOCODER_BASE_URL", DEFAULT_GEOCODER_BASE_URL);
    let places_base_url = or_default("HFL_PLACES_BASE_URL", DEFAULT_PLACES_BASE_URL);
    let user_agent = or_default("HFL_USER_AGENT", DEFAULT_USER_AGENT);

    let request_timeout_secs = parse_u64("HFL_REQUEST_TIMEOUT_SECS", "10")?;
    if request_timeout_secs == 0 {
        return Err(invalid(
            "HFL_REQUEST_TIMEOUT_SECS",
            "must be greater than zero".to_string(),
        ));
    }

    let search_query = or_default("HFL_SEARCH_QUERY", DEFAULT_SEARCH_QUERY);
    if search_query.trim().is_empty() {
        return Err(invalid("HFL_SEARCH_QUERY", "must not be empty".to_string()));
    }

    let search_limit = parse_u32("HFL_SEARCH_LIMIT", &DEFAULT_SEARCH_LIMIT.to_string())?;
    if !(1..=MAX_SEARCH_LIMIT).contains(&search_limit) {
        return Err(invalid(
            "HFL_SEARCH_LIMIT",
            format!("must be between 1 and {MAX_SEARCH_LIMIT}, got {search_limit}"),
        ));
    }

    let search_radius_m = parse_radius(&or_default(
        "HFL_SEARCH_RADIUS_M",
        &DEFAULT_SEARCH_RADIUS_M.to_string(),
    ))?;

    let default_place = or_default("HFL_DEFAULT_PLACE", DEFAULT_PLACE);

    let enrich_max_concurrent = parse_usize(
        "HFL_ENRICH_MAX_CONCURRENT",
        &DEFAULT_ENRICH_MAX_CONCURRENT.to_string(),
    )?;
    if enrich_max_concurrent == 0 {
        return Err(invalid(
            "HFL_ENRICH_MAX_CONCURRENT",
            "must be at least 1".to_string(),
        ));
    }

    Ok(AppConfig {
        env,
        log_level,
        foursquare_api_key,
        geocoder_base_url,
        places_base_url,
        user_agent,
        request_timeout_secs,
        search_query,
        search_limit,
        search_radius_m,
        default_place,
        enrich_max_concurrent,
    })
}

/// Parse a string into an `Environment` variant.
fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s.trim() {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "HFL_ENV".to_string(),
            reason: format!("unknown environment \"{other}\""),
        }),
    }
}

/// Empty or `0` means "let the service pick".
fn parse_radius(raw: &str) -> Result<Option<u32>, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let meters = trimmed
        .parse::<u32>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "HFL_SEARCH_RADIUS_M".to_string(),
            reason: e.to_string(),
        })?;
    Ok((meters > 0).then_some(meters))
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
