//! Shared HTTP plumbing for the geocoding and places clients.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Url};
use serde::de::DeserializeOwned;

use crate::error::PlacesError;

/// Builds the `reqwest::Client` both services use.
///
/// The request timeout bounds every external call, so a hung service ends up
/// as a [`PlacesError::Http`] timeout instead of an endless wait.
pub(crate) fn build_client(timeout_secs: u64, user_agent: &str) -> Result<Client, PlacesError> {
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
        .user_agent(user_agent)
        .build()?;
    Ok(client)
}

/// Parses `base_url` and normalises it to end in exactly one slash so path
/// segments append under it instead of replacing its last segment.
pub(crate) fn parse_base_url(base_url: &str) -> Result<Url, PlacesError> {
    let normalised = format!("{}/", base_url.trim_end_matches('/'));
    let url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
        url: base_url.to_owned(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: "expected an http(s) URL".to_owned(),
        });
    }
    Ok(url)
}

/// Appends percent-encoded path segments to a base URL from [`parse_base_url`].
pub(crate) fn endpoint(base_url: &Url, segments: &[&str]) -> Url {
    let mut url = base_url.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Sends the request, asserts a 2xx status, and decodes the body as `T`.
///
/// # Errors
///
/// - [`PlacesError::Http`] on network failure or timeout.
/// - [`PlacesError::UnexpectedStatus`] on any non-2xx status.
/// - [`PlacesError::Deserialize`] if the body does not decode as `T`.
pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &Url,
    context: &str,
) -> Result<T, PlacesError> {
    let response = request.send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(PlacesError::UnexpectedStatus {
            status: status.as_u16(),
            url: url.to_string(),
        });
    }
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
        context: context.to_owned(),
        source: e,
    })
}
