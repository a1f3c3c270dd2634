//! Robots.txt handling module
//!
//! This module fetches a site's robots.txt and turns it into a typed
//! [`CrawlPolicy`]. Fetching is fail-closed: a site whose robots.txt cannot be
//! retrieved is treated as disallowing access.

mod cache;
mod parser;

pub use cache::CachedPolicy;
pub use parser::{wildcard_crawl_delay, CrawlPolicy, MAX_CRAWL_DELAY, WILDCARD_AGENT};

use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Well-known location of the crawl policy document
pub const ROBOTS_PATH: &str = "/robots.txt";

/// Builds the robots.txt address for the site hosting `url`
///
/// Only the scheme and authority of `url` are kept.
///
/// # Example
///
/// ```
/// use url::Url;
/// use sumi_glean::robots::policy_url;
///
/// let page = Url::parse("https://example.test/docs/page?x=1#top").unwrap();
/// assert_eq!(
///     policy_url(&page).unwrap().as_str(),
///     "https://example.test/robots.txt"
/// );
/// ```
pub fn policy_url(url: &Url) -> Option<Url> {
    if url.host_str().is_none() {
        return None;
    }
    url.join(ROBOTS_PATH).ok()
}

/// Fetches and parses the crawl policy for the site hosting `url`
///
/// Any failure (network error, timeout, non-2xx status, unreadable body)
/// produces [`CrawlPolicy::unreachable`]. The request timeout is the one the
/// client was built with.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `url` - Any URL on the site
/// * `default_delay` - Delay used when robots.txt declares none
pub async fn fetch_policy(client: &Client, url: &Url, default_delay: Duration) -> CrawlPolicy {
    let Some(robots_url) = policy_url(url) else {
        tracing::warn!("Cannot derive robots.txt location from {}", url);
        return CrawlPolicy::unreachable(default_delay);
    };

    tracing::debug!("Fetching crawl policy from {}", robots_url);

    let response = match client.get(robots_url.as_str()).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Could not read robots.txt from {}: {}", robots_url, e);
            return CrawlPolicy::unreachable(default_delay);
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(
            "Could not read robots.txt from {}: HTTP {}",
            robots_url,
            status.as_u16()
        );
        return CrawlPolicy::unreachable(default_delay);
    }

    match response.text().await {
        Ok(body) => {
            let policy = CrawlPolicy::parse(&body, default_delay);
            tracing::debug!(
                "Crawl policy for {}: allowed={}, delay={:?}",
                robots_url,
                policy.allowed,
                policy.delay
            );
            policy
        }
        Err(e) => {
            tracing::warn!("Could not read robots.txt body from {}: {}", robots_url, e);
            CrawlPolicy::unreachable(default_delay)
        }
    }
}
