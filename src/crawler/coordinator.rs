//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties everything together:
//! - Seeding one frontier per target and draining it
//! - Consulting the crawl policy before any page fetch
//! - Running content extraction and link discovery
//! - Enforcing the politeness delay between page visits
//! - Collecting statistics

use crate::config::Config;
use crate::crawler::content::extract_content;
use crate::crawler::links::extract_links;
use crate::crawler::scheduler::{Frontier, ScheduledUrl, Scheduler};
use crate::crawler::build_http_client;
use crate::output::{CrawlStatistics, CsvSink, RecordSink, SiteStatistics};
use crate::robots::{fetch_policy, CrawlPolicy};
use crate::url::normalize_url;
use crate::GleanError;
use reqwest::Client;
use std::path::Path;
use std::time::Instant;

/// Main crawler structure
///
/// A crawler owns its scheduler (visited set, per-domain state) and its
/// record sink, so several independent crawls can live in one process.
pub struct Crawler<S: RecordSink> {
    config: Config,
    client: Client,
    scheduler: Scheduler,
    sink: S,
}

impl<S: RecordSink> Crawler<S> {
    /// Creates a new crawler writing to `sink`
    ///
    /// # Returns
    ///
    /// * `Ok(Crawler)` - Ready to crawl
    /// * `Err(GleanError)` - The HTTP client could not be built
    pub fn new(config: Config, sink: S) -> Result<Self, GleanError> {
        let client = build_http_client(&config.user_agent, config.crawler.request_timeout())?;

        Ok(Self {
            config,
            client,
            scheduler: Scheduler::new(),
            sink,
        })
    }

    /// Crawls every configured target, one after the other
    ///
    /// Each target's frontier is fully drained before the next target
    /// starts. Only a sink failure stops the run early.
    pub async fn run(&mut self) -> Result<CrawlStatistics, GleanError> {
        let targets = self.config.targets.clone();
        let mut stats = CrawlStatistics::default();

        tracing::info!("Starting crawl of {} targets", targets.len());

        for target in &targets {
            let site = self.crawl_site(&target.url, &target.selectors).await?;
            stats.sites.push(site);
        }

        tracing::info!(
            "Crawl completed: {} pages visited, {} records written",
            stats.total_pages_visited(),
            stats.total_records()
        );

        Ok(stats)
    }

    /// Crawls one site starting from `seed`
    ///
    /// The crawl stays within URLs whose authority ends with the seed's
    /// authority. For each dequeued URL:
    ///
    /// 1. Skip it if already visited; otherwise mark it visited
    /// 2. Look up the crawl policy; stop here if it refuses the URL
    /// 3. Wait for the site's politeness gate
    /// 4. Extract content and append it to the sink
    /// 5. Discover links and queue the unvisited ones
    /// 6. Close the gate for the policy's delay
    pub async fn crawl_site(
        &mut self,
        seed: &str,
        selectors: &[String],
    ) -> Result<SiteStatistics, GleanError> {
        let seed_url = normalize_url(seed)?;
        let mut frontier = Frontier::new(seed_url)?;
        let site_key = frontier.domain().to_string();
        let max_pages = self.config.crawler.max_pages.map(u64::from);
        let respect_disallow = self.config.crawler.respect_disallow;

        let mut site = SiteStatistics::new(seed);
        let skipped_before = self.scheduler.duplicates_skipped();
        let start_time = Instant::now();

        tracing::info!("Crawling {} (domain {})", seed, site_key);

        loop {
            if let Some(max) = max_pages {
                if site.pages_visited >= max {
                    if !frontier.is_empty() {
                        tracing::warn!(
                            "Page limit of {} reached for {}, {} URLs left unvisited",
                            max,
                            site_key,
                            frontier.len()
                        );
                        site.page_limit_hit = true;
                    }
                    break;
                }
            }

            let Some(scheduled) = self.scheduler.next_url(&mut frontier) else {
                break;
            };
            let url = scheduled.url.clone();

            let policy = self.policy_for(&scheduled).await;
            if !policy.permits(&url, respect_disallow) {
                tracing::info!("Blocked by robots.txt: {}", url);
                site.pages_blocked += 1;
                self.scheduler.finish(&url);
                continue;
            }

            self.scheduler.wait_for_turn(&site_key).await;

            let records = extract_content(&self.client, &url, selectors).await;
            self.sink.append_all(&records)?;
            site.records_written += records.len() as u64;

            let links = extract_links(&self.client, &url, frontier.domain()).await;
            let queued = self.scheduler.enqueue_links(&mut frontier, links);
            site.links_queued += queued as u64;

            self.scheduler.record_fetch(&site_key, policy.delay);
            self.scheduler.finish(&url);
            site.pages_visited += 1;

            tracing::debug!(
                "Visited {} ({} records, {} new links, {} in frontier)",
                url,
                records.len(),
                queued,
                frontier.len()
            );
        }

        site.duplicates_skipped = self.scheduler.duplicates_skipped() - skipped_before;
        site.elapsed = start_time.elapsed();

        tracing::info!(
            "Finished {}: {} pages visited, {} blocked, {} records in {:?}",
            seed,
            site.pages_visited,
            site.pages_blocked,
            site.records_written,
            site.elapsed
        );

        Ok(site)
    }

    /// Gets the crawl policy for a URL's domain, fetching it if needed
    ///
    /// Policies are cached per authority for the rest of the run, including
    /// fail-closed ones.
    async fn policy_for(&mut self, scheduled: &ScheduledUrl) -> CrawlPolicy {
        if let Some(policy) = self.scheduler.cached_policy(&scheduled.authority) {
            tracing::debug!("Using cached crawl policy for {}", scheduled.authority);
            return policy.clone();
        }

        let policy = fetch_policy(
            &self.client,
            &scheduled.url,
            self.config.crawler.default_delay(),
        )
        .await;

        if policy.allowed {
            tracing::info!(
                "Crawl policy for {}: delay {:.1}s",
                scheduled.authority,
                policy.delay.as_secs_f64()
            );
        } else {
            tracing::info!(
                "Crawl policy for {} unavailable, treating domain as disallowed",
                scheduled.authority
            );
        }

        self.scheduler.store_policy(&scheduled.authority, policy.clone());
        policy
    }

    /// Returns the scheduler, for inspecting visited URLs and domain state
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Returns the record sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Consumes the crawler and returns its record sink
    pub fn into_sink(self) -> S {
        self.sink
    }
}

/// Runs the main crawl operation
///
/// Creates (truncating) the configured CSV file, writes the header row, and
/// crawls every target in order.
///
/// # Example
///
/// ```no_run
/// use sumi_glean::config::load_config;
/// use sumi_glean::crawler::run_crawl;
/// use std::path::Path;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("glean.toml"))?;
/// let stats = run_crawl(config).await?;
/// println!("{} records", stats.total_records());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlStatistics, GleanError> {
    let sink = CsvSink::create(Path::new(&config.output.csv_path))?;
    tracing::info!("Writing records to {}", config.output.csv_path);

    let mut crawler = Crawler::new(config, sink)?;
    crawler.run().await
}
