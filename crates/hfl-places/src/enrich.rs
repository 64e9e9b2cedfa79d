//! Per-venue detail fan-out.

use futures::stream::{self, StreamExt};
use hfl_core::{EnrichedVenue, VenueCandidate};

use crate::foursquare::PlacesClient;

/// Fetches detail for every candidate concurrently and merges it in.
///
/// Up to `max_concurrent` detail requests are in flight at once. The output
/// has exactly one entry per candidate, in input order, regardless of which
/// request finishes first. A failed detail request is logged and yields the
/// candidate with empty photos and no rating; it never affects siblings.
pub async fn enrich_venues(
    client: &PlacesClient,
    candidates: Vec<VenueCandidate>,
    max_concurrent: usize,
) -> Vec<EnrichedVenue> {
    let total = candidates.len();
    let enriched: Vec<EnrichedVenue> = stream::iter(candidates)
        .map(|candidate| async move {
            match client.place_details(&candidate.id).await {
                Ok(detail) => EnrichedVenue::new(candidate, detail),
                Err(e) => {
                    tracing::warn!(
                        venue_id = %candidate.id,
                        error = %e,
                        "place detail fetch failed; using defaults"
                    );
                    EnrichedVenue::without_detail(candidate)
                }
            }
        })
        .buffered(max_concurrent.max(1))
        .collect()
        .await;

    let failed = enriched.iter().filter(|v| !v.detail_fetched).count();
    tracing::debug!(total, failed, "enrichment settled");
    enriched
}
