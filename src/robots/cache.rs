//! Crawl policy caching
//!
//! A policy is fetched once per domain and reused for every page of that
//! domain for the rest of the run. Entries older than 24 hours are treated
//! as stale so very long crawls pick up changes made by the site owner.

use crate::robots::CrawlPolicy;
use chrono::{DateTime, Duration, Utc};

/// A crawl policy together with the time it was fetched
#[derive(Debug, Clone)]
pub struct CachedPolicy {
    /// The parsed policy
    pub policy: CrawlPolicy,

    /// When the robots.txt was fetched
    pub fetched_at: DateTime<Utc>,
}

impl CachedPolicy {
    /// Wraps a policy stamped with the current time
    pub fn new(policy: CrawlPolicy) -> Self {
        Self {
            policy,
            fetched_at: Utc::now(),
        }
    }

    /// Checks if the cached policy is older than 24 hours
    pub fn is_stale(&self) -> bool {
        self.age() > Duration::hours(24)
    }

    /// Returns how long ago the policy was fetched
    pub fn age(&self) -> Duration {
        Utc::now() - self.fetched_at
    }
}
