//! `search` command: run one orchestrated search and print the outcome.

use std::fmt::Write as _;

use hfl_core::{AppConfig, EnrichedVenue};
use hfl_search::{MapRenderer, MapView, MarkerKind, SearchOrchestrator, SearchPhase, SearchState};

/// Requested photo dimensions for printed photo URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhotoSize {
    pub width: u32,
    pub height: u32,
}

/// Parses `WIDTHxHEIGHT`, e.g. `300x300`.
///
/// # Errors
///
/// Returns a message for clap when the separator is missing or either
/// dimension is not a positive integer.
pub fn parse_photo_size(raw: &str) -> Result<PhotoSize, String> {
    let (w, h) = raw
        .trim()
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{raw}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .ok()
            .filter(|v| *v > 0)
            .ok_or_else(|| format!("invalid dimension '{part}' in '{raw}'"))
    };
    Ok(PhotoSize {
        width: parse(w)?,
        height: parse(h)?,
    })
}

pub(crate) async fn run_search(
    config: &AppConfig,
    place: Option<&str>,
    json: bool,
    photo_size: PhotoSize,
) -> anyhow::Result<()> {
    let orchestrator = SearchOrchestrator::from_config(config)?;
    let options = orchestrator.options();
    tracing::info!(
        place = place.unwrap_or(&options.default_place),
        query = %options.params.query,
        limit = options.params.limit,
        "running search"
    );
    let state = match place {
        Some(place) => orchestrator.search(place).await,
        None => orchestrator.initialize().await,
    };
    tracing::info!(
        phase = ?state.phase,
        venues = state.venues.len(),
        "search finished"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&state)?);
    } else {
        print!("{}", format_state(&state, photo_size));
        if let Some(view) = MapView::from_state(&state) {
            let mut renderer = TextMapRenderer::default();
            renderer.render(&view);
            print!("{}", renderer.output);
        }
    }

    if state.phase == SearchPhase::Error {
        let message = state
            .error_message()
            .unwrap_or_else(|| "search failed".to_owned());
        anyhow::bail!(message);
    }
    Ok(())
}

/// Formats a rating as `x.x` with its five-star equivalent, or `N/A` when the
/// venue has none.
pub(crate) fn fmt_rating(venue: &EnrichedVenue) -> String {
    venue.rating.map_or_else(
        || "N/A".to_owned(),
        |r| {
            let stars = usize::from(r.stars());
            format!("{:.1} {}{}", r.value(), "*".repeat(stars), ".".repeat(5 - stars))
        },
    )
}

pub(crate) fn format_card(venue: &EnrichedVenue, photo_size: PhotoSize) -> String {
    let address = venue
        .candidate
        .display_address()
        .unwrap_or("Address not available");
    let photo = venue
        .primary_photo_url(photo_size.width, photo_size.height)
        .unwrap_or_else(|| "no photo".to_owned());

    let mut card = format!("* {}\n", venue.name());
    if !venue.candidate.categories.is_empty() {
        let _ = writeln!(card, "  {}", venue.candidate.categories.join(", "));
    }
    let _ = writeln!(card, "  address: {address}");
    let _ = writeln!(card, "  rating:  {}", fmt_rating(venue));
    let _ = writeln!(card, "  photo:   {photo}");
    card
}

/// Text rendering of a terminal search state. Errors produce no output here;
/// the caller reports them.
pub(crate) fn format_state(state: &SearchState, photo_size: PhotoSize) -> String {
    let mut out = String::new();
    if state.phase != SearchPhase::Success {
        return out;
    }

    if let Some(place) = &state.place_name {
        let _ = writeln!(out, "Healthy food near {place}");
    }
    if let Some(coordinates) = state.coordinates {
        let _ = writeln!(
            out,
            "{}: {coordinates}",
            hfl_search::map::USER_LOCATION_LABEL
        );
    }
    out.push('\n');

    if state.venues.is_empty() {
        out.push_str("No venues found.\n");
        return out;
    }
    for venue in &state.venues {
        out.push_str(&format_card(venue, photo_size));
    }
    out
}

/// Renders map markers as plain text lines.
#[derive(Debug, Default)]
pub(crate) struct TextMapRenderer {
    pub(crate) output: String,
}

impl MapRenderer for TextMapRenderer {
    fn render(&mut self, view: &MapView) {
        let _ = writeln!(
            self.output,
            "\nMap centered at {} (zoom {})",
            view.center, view.zoom
        );
        for marker in &view.markers {
            let symbol = match marker.kind {
                MarkerKind::UserLocation => '@',
                MarkerKind::Venue => '+',
            };
            let _ = writeln!(
                self.output,
                "  {symbol} {} [{}]",
                marker.label, marker.position
            );
        }
        let _ = writeln!(
            self.output,
            "  tiles: {} ({})",
            hfl_search::map::OSM_TILE_URL_TEMPLATE,
            hfl_search::map::OSM_ATTRIBUTION
        );
    }
}
