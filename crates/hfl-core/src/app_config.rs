#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub foursquare_api_key: String,
    pub geocoder_base_url: String,
    pub places_base_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    pub search_query: String,
    pub search_limit: u32,
    /// `None` leaves the radius to the places service.
    pub search_radius_m: Option<u32>,
    pub default_place: String,
    pub enrich_max_concurrent: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("foursquare_api_key", &"[redacted]")
            .field("geocoder_base_url", &self.geocoder_base_url)
            .field("places_base_url", &self.places_base_url)
            .field("user_agent", &self.user_agent)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("search_query", &self.search_query)
            .field("search_limit", &self.search_limit)
            .field("search_radius_m", &self.search_radius_m)
            .field("default_place", &self.default_place)
            .field("enrich_max_concurrent", &self.enrich_max_concurrent)
            .finish()
    }
}
