use crate::robots::{CachedPolicy, CrawlPolicy, MAX_CRAWL_DELAY};
use std::time::{Duration, Instant};

/// Tracks the state of a domain during crawling
///
/// Holds the politeness watermark (the earliest instant the next page of this
/// domain may be fetched) and the crawl policy fetched for it.
#[derive(Debug, Clone, Default)]
pub struct DomainState {
    /// Number of pages fetched from this domain in the current run
    pub pages_fetched: u32,

    /// Earliest instant at which the next page may be fetched
    pub next_fetch_at: Option<Instant>,

    /// Crawl policy fetched for this domain
    pub policy: Option<CachedPolicy>,
}

impl DomainState {
    /// Creates a new DomainState with no history
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if a page of this domain can be fetched at `now`
    pub fn can_fetch(&self, now: Instant) -> bool {
        self.time_until_next_fetch(now).is_none()
    }

    /// Calculates the time until the next fetch is allowed
    ///
    /// Returns None if a fetch can be made now.
    pub fn time_until_next_fetch(&self, now: Instant) -> Option<Duration> {
        match self.next_fetch_at {
            Some(next) if next > now => Some(next - now),
            _ => None,
        }
    }

    /// Records a completed page visit and arms the politeness gate
    ///
    /// The next fetch is allowed no earlier than `now + delay`, with `delay`
    /// capped at [`MAX_CRAWL_DELAY`].
    pub fn record_fetch(&mut self, now: Instant, delay: Duration) {
        self.pages_fetched += 1;
        let delay = delay.min(MAX_CRAWL_DELAY);
        self.next_fetch_at = Some(now.checked_add(delay).unwrap_or(now));
    }

    /// Returns the cached policy if one exists and is still fresh
    pub fn fresh_policy(&self) -> Option<&CrawlPolicy> {
        self.policy
            .as_ref()
            .filter(|cached| !cached.is_stale())
            .map(|cached| &cached.policy)
    }

    /// Updates the cached policy
    pub fn update_policy(&mut self, policy: CrawlPolicy) {
        self.policy = Some(CachedPolicy::new(policy));
    }
}
