//! Crawler module for page fetching, extraction and scheduling
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing for links and selector content
//! - Frontier and visited-set management with per-site politeness
//! - Overall crawl coordination

mod content;
mod coordinator;
mod fetcher;
mod links;
mod parser;
mod scheduler;

pub use content::extract_content;
pub use coordinator::{run_crawl, Crawler};
pub use fetcher::{build_http_client, fetch_url, FetchResult};
pub use links::extract_links;
pub use parser::{parse_content, parse_links, visible_text, MAX_MATCHES_PER_SELECTOR};
pub use scheduler::{Frontier, ScheduledUrl, Scheduler};

use crate::config::Config;
use crate::output::CrawlStatistics;
use crate::GleanError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Create the CSV output file
/// 2. Build the HTTP client
/// 3. Crawl each target in turn, draining its frontier
/// 4. Return the collected statistics
pub async fn crawl(config: Config) -> Result<CrawlStatistics, GleanError> {
    run_crawl(config).await
}
