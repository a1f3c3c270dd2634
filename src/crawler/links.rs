//! Link discovery
//!
//! Fetches a page and returns the same-domain links found on it. The result
//! is not checked against the visited set or the frontier; that is the
//! scheduler's job.

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::parse_links;
use reqwest::Client;
use std::collections::HashSet;
use url::Url;

/// Fetches `url` and extracts the links whose authority ends with `domain`
///
/// Relative links are resolved against `url` itself. A page that cannot be
/// fetched yields an empty set; the failure is logged and not propagated.
/// Error pages (non-2xx) that still carry a body are scanned for links too.
pub async fn extract_links(client: &Client, url: &Url, domain: &str) -> HashSet<Url> {
    let result = fetch_url(client, url.as_str()).await;

    if let FetchResult::HttpError { status_code, .. } = &result {
        tracing::debug!(
            "Scanning HTTP {} response from {} for links",
            status_code,
            url
        );
    }

    let description = result.describe();
    match result.any_body() {
        Some(body) => {
            let links = parse_links(&body, url, domain);
            tracing::debug!("Found {} same-domain links on {}", links.len(), url);
            links
        }
        None => {
            tracing::warn!("Error fetching {} for links: {}", url, description);
            HashSet::new()
        }
    }
}
