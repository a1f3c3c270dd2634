//! Selector-driven content extraction

use crate::crawler::fetcher::{fetch_url, FetchResult};
use crate::crawler::parser::parse_content;
use crate::output::ExtractedRecord;
use reqwest::Client;
use url::Url;

/// Fetches `url` and extracts the text matching each selector
///
/// See [`parse_content`] for the matching rules (selector order, at most five
/// elements per selector, blank text skipped). A network error or non-2xx
/// status yields no records; the failure is logged and not propagated.
pub async fn extract_content(
    client: &Client,
    url: &Url,
    selectors: &[String],
) -> Vec<ExtractedRecord> {
    tracing::info!("Scraping: {}", url);

    match fetch_url(client, url.as_str()).await {
        FetchResult::Success { body, .. } => {
            let records = parse_content(&body, url.as_str(), selectors);
            for record in &records {
                tracing::info!(" - ({}) {}", record.selector, record.text);
            }
            records
        }
        failure => {
            tracing::warn!("Failed to fetch {}: {}", url, failure.describe());
            Vec::new()
        }
    }
}
