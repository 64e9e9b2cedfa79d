//! End-to-end tests for `SearchOrchestrator` against wiremock geocoding and
//! places servers.

use std::sync::Arc;
use std::time::Duration;

use hfl_places::{GeocoderClient, PlacesClient};
use hfl_search::{SearchError, SearchOptions, SearchOrchestrator, SearchPhase};
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const JAKARTA: (&str, &str) = ("-6.1754", "106.8272");
const BANDUNG: (&str, &str) = ("-6.9175", "107.6191");
const SUKABUMI: (&str, &str) = ("-6.9218", "106.9267");

/// A geocoder mock server and a places mock server.
struct Harness {
    geo: MockServer,
    places: MockServer,
}

impl Harness {
    async fn start() -> Self {
        Self {
            geo: MockServer::start().await,
            places: MockServer::start().await,
        }
    }

    fn orchestrator(&self) -> SearchOrchestrator {
        let geocoder =
            GeocoderClient::with_base_url(5, "hfl-test/0.1 (tests@example.com)", &self.geo.uri())
                .expect("geocoder client");
        let places = PlacesClient::with_base_url("fsq-test-key", 5, "hfl-test/0.1", &self.places.uri())
            .expect("places client");
        SearchOrchestrator::new(geocoder, places, SearchOptions::default())
    }

    async fn geocode(&self, place: &str, (lat, lon): (&str, &str), delay: Duration) {
        Mock::given(method("GET"))
            .and(path("/search"))
            .and(query_param("q", place))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{ "lat": lat, "lon": lon, "display_name": place }]))
                    .set_delay(delay),
            )
            .mount(&self.geo)
            .await;
    }

    async fn nearby(&self, (lat, lon): (&str, &str), ids: &[&str], expected_calls: u64) {
        let results: Vec<serde_json::Value> = ids.iter().map(|id| place_json(id)).collect();
        Mock::given(method("GET"))
            .and(path("/places/search"))
            .and(query_param("ll", format!("{lat},{lon}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": results })))
            .expect(expected_calls)
            .mount(&self.places)
            .await;
    }

    async fn detail(&self, id: &str, template: ResponseTemplate) {
        Mock::given(method("GET"))
            .and(path(format!("/places/{id}")))
            .respond_with(template)
            .mount(&self.places)
            .await;
    }

    async fn detail_ok(&self, id: &str, rating: f64) {
        self.detail(id, ResponseTemplate::new(200).set_body_json(detail_json(rating)))
            .await;
    }
}

fn place_json(id: &str) -> serde_json::Value {
    json!({
        "fsq_id": id,
        "name": format!("Venue {id}"),
        "geocodes": { "main": { "latitude": -6.9, "longitude": 107.0 } },
        "categories": [ { "name": "Vegetarian / Vegan Restaurant" } ],
        "location": { "formatted_address": format!("{id} street") }
    })
}

fn detail_json(rating: f64) -> serde_json::Value {
    json!({
        "rating": rating,
        "photos": [ { "id": "p", "prefix": "https://img.example/", "suffix": "/p.jpg" } ]
    })
}

fn ids(state: &hfl_search::SearchState) -> Vec<String> {
    state.venues.iter().map(|v| v.id().to_owned()).collect()
}

#[tokio::test]
async fn search_returns_enriched_venues_in_search_order() {
    let h = Harness::start().await;
    h.geocode("Bandung", BANDUNG, Duration::ZERO).await;
    h.nearby(BANDUNG, &["v1", "v2", "v3"], 1).await;
    h.detail(
        "v1",
        ResponseTemplate::new(200)
            .set_body_json(detail_json(6.5))
            .set_delay(Duration::from_millis(250)),
    )
    .await;
    h.detail_ok("v2", 7.5).await;
    h.detail_ok("v3", 8.5).await;

    let orchestrator = h.orchestrator();
    let state = orchestrator.search("  Bandung  ").await;

    assert_eq!(state.phase, SearchPhase::Success);
    assert_eq!(state.place_name.as_deref(), Some("Bandung"));
    assert_eq!(ids(&state), vec!["v1", "v2", "v3"]);
    assert!(state.venues.iter().all(|v| v.detail_fetched));
    assert_eq!(
        state.venues[0].rating.map(hfl_core::Rating::value),
        Some(6.5)
    );
    assert!(state.error.is_none());
    assert!(state.completed_at.is_some());

    let coords = state.coordinates.expect("coordinates set");
    assert!((coords.latitude() - -6.9175).abs() < 1e-9);
    assert_eq!(orchestrator.state(), state);
}

#[tokio::test]
async fn blank_input_errors_without_any_request() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.geo)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.places)
        .await;

    let orchestrator = h.orchestrator();
    for input in ["", "   ", "\t\n"] {
        let state = orchestrator.search(input).await;
        assert_eq!(state.phase, SearchPhase::Error);
        assert_eq!(state.error, Some(SearchError::InputInvalid));
        assert!(state.venues.is_empty());
        assert!(state.coordinates.is_none());
    }
}

#[tokio::test]
async fn blank_input_after_success_clears_results() {
    let h = Harness::start().await;
    h.geocode("Bandung", BANDUNG, Duration::ZERO).await;
    h.nearby(BANDUNG, &["v1"], 1).await;
    h.detail_ok("v1", 9.0).await;

    let orchestrator = h.orchestrator();
    let first = orchestrator.search("Bandung").await;
    assert_eq!(first.venues.len(), 1);

    let state = orchestrator.search(" ").await;
    assert_eq!(state.phase, SearchPhase::Error);
    assert_eq!(
        state.error_message().as_deref(),
        Some("Please enter a location name.")
    );
    assert!(state.venues.is_empty());
    assert!(state.generation > first.generation);
}

#[tokio::test]
async fn zero_geocode_matches_is_not_found() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&h.geo)
        .await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&h.places)
        .await;

    let state = h.orchestrator().search("Atlantis").await;

    assert_eq!(state.phase, SearchPhase::Error);
    assert_eq!(
        state.error,
        Some(SearchError::NotFound {
            place: "Atlantis".to_owned()
        })
    );
    assert_eq!(state.error_message().as_deref(), Some("Location not found."));
    assert!(state.venues.is_empty());
    assert!(state.coordinates.is_none());
}

#[tokio::test]
async fn geocoder_outage_is_service_unavailable() {
    let h = Harness::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&h.geo)
        .await;

    let state = h.orchestrator().search("Jakarta").await;

    assert_eq!(state.phase, SearchPhase::Error);
    assert!(matches!(
        state.error,
        Some(SearchError::ServiceUnavailable { .. })
    ));
    assert!(state.venues.is_empty());
}

#[tokio::test]
async fn places_search_failure_is_empty_success() {
    let h = Harness::start().await;
    h.geocode("Jakarta", JAKARTA, Duration::ZERO).await;
    Mock::given(method("GET"))
        .and(path("/places/search"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&h.places)
        .await;

    let state = h.orchestrator().search("Jakarta").await;

    assert_eq!(state.phase, SearchPhase::Success);
    assert!(state.venues.is_empty());
    assert!(state.error.is_none());
    assert!(state.coordinates.is_some());
}

#[tokio::test]
async fn places_search_with_no_results_is_empty_success() {
    let h = Harness::start().await;
    h.geocode("Jakarta", JAKARTA, Duration::ZERO).await;
    h.nearby(JAKARTA, &[], 1).await;

    let state = h.orchestrator().search("Jakarta").await;

    assert_eq!(state.phase, SearchPhase::Success);
    assert!(state.venues.is_empty());
    assert!(state.coordinates.is_some());
}

#[tokio::test]
async fn single_detail_failure_keeps_every_venue() {
    let h = Harness::start().await;
    h.geocode("Bandung", BANDUNG, Duration::ZERO).await;
    h.nearby(BANDUNG, &["v1", "v2", "v3"], 1).await;
    h.detail_ok("v1", 7.0).await;
    h.detail("v2", ResponseTemplate::new(500)).await;
    h.detail_ok("v3", 8.0).await;

    let state = h.orchestrator().search("Bandung").await;

    assert_eq!(state.phase, SearchPhase::Success);
    assert_eq!(ids(&state), vec!["v1", "v2", "v3"]);

    let failed = &state.venues[1];
    assert!(!failed.detail_fetched);
    assert!(failed.photos.is_empty());
    assert!(failed.rating.is_none());

    for ok in [&state.venues[0], &state.venues[2]] {
        assert!(ok.detail_fetched);
        assert_eq!(ok.photos.len(), 1);
        assert!(ok.rating.is_some());
    }
}

#[tokio::test]
async fn newer_search_supersedes_slow_geocode() {
    let h = Harness::start().await;
    h.geocode("Jakarta", JAKARTA, Duration::from_millis(500)).await;
    h.geocode("Bandung", BANDUNG, Duration::ZERO).await;
    // The superseded Jakarta cycle must stop before searching.
    h.nearby(JAKARTA, &["jkt1"], 0).await;
    h.nearby(BANDUNG, &["bdg1", "bdg2"], 1).await;
    h.detail_ok("bdg1", 8.0).await;
    h.detail_ok("bdg2", 9.0).await;

    let orchestrator = Arc::new(h.orchestrator());
    let jakarta = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.search("Jakarta").await }
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    let bandung = orchestrator.search("Bandung").await;
    let jakarta = jakarta.await.expect("jakarta task");

    let final_state = orchestrator.state();
    assert_eq!(final_state, bandung);
    assert_eq!(final_state.place_name.as_deref(), Some("Bandung"));
    assert_eq!(ids(&final_state), vec!["bdg1", "bdg2"]);
    let coords = final_state.coordinates.expect("coordinates");
    assert!((coords.longitude() - 107.6191).abs() < 1e-9);

    // The superseded call reports the winning state, not its own.
    assert_eq!(jakarta.place_name.as_deref(), Some("Bandung"));
}

#[tokio::test]
async fn newer_search_supersedes_slow_enrichment() {
    let h = Harness::start().await;
    h.geocode("Jakarta", JAKARTA, Duration::ZERO).await;
    h.geocode("Bandung", BANDUNG, Duration::ZERO).await;
    h.nearby(JAKARTA, &["jkt1"], 1).await;
    h.nearby(BANDUNG, &["bdg1"], 1).await;
    h.detail(
        "jkt1",
        ResponseTemplate::new(200)
            .set_body_json(detail_json(5.0))
            .set_delay(Duration::from_millis(600)),
    )
    .await;
    h.detail_ok("bdg1", 9.0).await;

    let orchestrator = Arc::new(h.orchestrator());
    let mut updates = orchestrator.subscribe();
    let jakarta = tokio::spawn({
        let orchestrator = Arc::clone(&orchestrator);
        async move { orchestrator.search("Jakarta").await }
    });

    // Wait until the Jakarta cycle has geocoded and is enriching.
    updates
        .wait_for(|s| s.coordinates.is_some())
        .await
        .expect("state channel open");
    tokio::time::sleep(Duration::from_millis(100)).await;

    let bandung = orchestrator.search("Bandung").await;
    jakarta.await.expect("jakarta task");

    let final_state = orchestrator.state();
    assert_eq!(final_state, bandung);
    assert_eq!(ids(&final_state), vec!["bdg1"]);
    assert_eq!(final_state.phase, SearchPhase::Success);
}

#[tokio::test]
async fn repeated_search_is_idempotent() {
    let h = Harness::start().await;
    h.geocode("Bandung", BANDUNG, Duration::ZERO).await;
    h.nearby(BANDUNG, &["v1", "v2"], 2).await;
    h.detail_ok("v1", 7.0).await;
    h.detail("v2", ResponseTemplate::new(500)).await;

    let orchestrator = h.orchestrator();
    let first = orchestrator.search("Bandung").await;
    let second = orchestrator.search("Bandung").await;

    assert_eq!(first.venues, second.venues);
    assert_eq!(first.coordinates, second.coordinates);
    assert_eq!(first.phase, second.phase);
    assert_eq!(second.generation, first.generation + 1);
}

#[tokio::test]
async fn initialize_searches_default_place() {
    let h = Harness::start().await;
    h.geocode("Sukabumi, Indonesia", SUKABUMI, Duration::ZERO).await;
    h.nearby(SUKABUMI, &["skb1"], 1).await;
    h.detail_ok("skb1", 8.8).await;

    let orchestrator = h.orchestrator();
    assert_eq!(orchestrator.state().phase, SearchPhase::Idle);

    let state = orchestrator.initialize().await;

    assert_eq!(state.phase, SearchPhase::Success);
    assert_eq!(state.place_name.as_deref(), Some("Sukabumi, Indonesia"));
    assert_eq!(ids(&state), vec!["skb1"]);
}

#[tokio::test]
async fn subscribers_never_see_partial_venue_lists() {
    let h = Harness::start().await;
    h.geocode("Bandung", BANDUNG, Duration::from_millis(50)).await;
    h.nearby(BANDUNG, &["v1", "v2"], 1).await;
    h.detail_ok("v1", 7.0).await;
    h.detail(
        "v2",
        ResponseTemplate::new(200)
            .set_body_json(detail_json(8.0))
            .set_delay(Duration::from_millis(200)),
    )
    .await;

    let orchestrator = Arc::new(h.orchestrator());
    let mut updates = orchestrator.subscribe();
    let watcher = tokio::spawn(async move {
        let mut seen = Vec::new();
        while updates.changed().await.is_ok() {
            let state = updates.borrow_and_update().clone();
            let done = state.phase == SearchPhase::Success;
            seen.push((state.phase, state.venues.len()));
            if done {
                break;
            }
        }
        seen
    });

    orchestrator.search("Bandung").await;
    let seen = tokio::time::timeout(Duration::from_secs(5), watcher)
        .await
        .expect("watcher finished")
        .expect("watcher task");

    assert_eq!(seen.last(), Some(&(SearchPhase::Success, 2)));
    for (phase, venues) in &seen {
        if *phase == SearchPhase::Loading {
            assert_eq!(*venues, 0, "loading state exposed venues: {seen:?}");
        }
    }
}

#[test]
fn default_options_follow_config_defaults() {
    use hfl_core::config::{DEFAULT_ENRICH_MAX_CONCURRENT, DEFAULT_PLACE};

    let options = SearchOptions::default();
    assert_eq!(options.default_place, DEFAULT_PLACE);
    assert_eq!(options.enrich_max_concurrent, DEFAULT_ENRICH_MAX_CONCURRENT);
    assert_eq!(options.params, hfl_places::SearchParams::default());
}
