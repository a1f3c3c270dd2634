//! Crawl statistics
//!
//! Counters collected by the crawler while it runs, and a plain-text report
//! printed at the end of a crawl.

use std::time::Duration;

/// Counters for one crawled target
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SiteStatistics {
    /// Seed URL of the target
    pub seed: String,

    /// Pages dequeued and fetched (policy allowed them)
    pub pages_visited: u64,

    /// Pages dequeued but refused by the crawl policy
    pub pages_blocked: u64,

    /// Records handed to the sink
    pub records_written: u64,

    /// New URLs added to the frontier
    pub links_queued: u64,

    /// Frontier entries discarded because they were already visited
    pub duplicates_skipped: u64,

    /// Whether the crawl stopped at the configured page ceiling
    pub page_limit_hit: bool,

    /// Wall-clock time spent on this target
    pub elapsed: Duration,
}

impl SiteStatistics {
    pub fn new(seed: impl Into<String>) -> Self {
        Self {
            seed: seed.into(),
            ..Self::default()
        }
    }

    /// Pages dequeued, whether visited or blocked
    pub fn pages_dequeued(&self) -> u64 {
        self.pages_visited + self.pages_blocked
    }
}

/// Statistics for a whole run (all targets)
#[derive(Debug, Clone, Default)]
pub struct CrawlStatistics {
    /// Per-target statistics, in crawl order
    pub sites: Vec<SiteStatistics>,
}

impl CrawlStatistics {
    pub fn total_pages_visited(&self) -> u64 {
        self.sites.iter().map(|s| s.pages_visited).sum()
    }

    pub fn total_pages_blocked(&self) -> u64 {
        self.sites.iter().map(|s| s.pages_blocked).sum()
    }

    pub fn total_records(&self) -> u64 {
        self.sites.iter().map(|s| s.records_written).sum()
    }

    pub fn total_elapsed(&self) -> Duration {
        self.sites.iter().map(|s| s.elapsed).sum()
    }
}

/// Prints statistics to stdout in a formatted manner
pub fn print_statistics(stats: &CrawlStatistics) {
    println!("=== Crawl Statistics ===\n");

    for site in &stats.sites {
        println!("{}:", site.seed);
        println!("  Pages visited: {}", site.pages_visited);
        println!("  Pages blocked by policy: {}", site.pages_blocked);
        println!("  Records written: {}", site.records_written);
        println!("  Links queued: {}", site.links_queued);
        println!("  Duplicates skipped: {}", site.duplicates_skipped);
        if site.page_limit_hit {
            println!("  Stopped at page limit");
        }
        println!("  Elapsed: {:.1}s", site.elapsed.as_secs_f64());
        println!();
    }

    println!(
        "Total: {} pages visited, {} blocked, {} records in {:.1}s",
        stats.total_pages_visited(),
        stats.total_pages_blocked(),
        stats.total_records(),
        stats.total_elapsed().as_secs_f64()
    );
}
