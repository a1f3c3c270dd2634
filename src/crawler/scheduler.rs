//! Scheduler for managing the crawl frontier and politeness
//!
//! This module handles:
//! - The per-site frontier of URLs waiting to be visited
//! - The run-wide visited set that guarantees each URL is fetched once
//! - Per-domain politeness gates derived from crawl policies

use crate::robots::CrawlPolicy;
use crate::state::{DomainState, PageState};
use crate::url::{extract_authority, in_scope};
use crate::UrlError;
use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};
use url::Url;

/// The URLs of one site still waiting to be visited
///
/// Iteration order is unspecified. Every URL in the frontier is in the scope
/// of the frontier's domain.
#[derive(Debug, Clone)]
pub struct Frontier {
    /// Authority of the seed URL; bounds the crawl
    domain: String,

    /// URLs waiting to be visited
    pending: HashSet<Url>,
}

impl Frontier {
    /// Creates a frontier holding only the seed URL
    pub fn new(seed: Url) -> Result<Self, UrlError> {
        let domain = extract_authority(&seed).ok_or(UrlError::MissingDomain)?;
        let mut pending = HashSet::new();
        pending.insert(seed);
        Ok(Self { domain, pending })
    }

    /// The authority every URL in this frontier ends with
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Adds a URL if it is in scope; returns true if it was newly added
    pub fn push(&mut self, url: Url) -> bool {
        if !in_scope(&url, &self.domain) {
            tracing::trace!("Rejecting out-of-scope URL {}", url);
            return false;
        }
        self.pending.insert(url)
    }

    /// Removes and returns an arbitrary URL
    pub fn pop(&mut self) -> Option<Url> {
        let url = self.pending.iter().next().cloned()?;
        self.pending.remove(&url);
        Some(url)
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.pending.contains(url)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

/// What `Scheduler::next_url` hands back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledUrl {
    /// The URL to visit, already recorded as visited
    pub url: Url,

    /// Its authority, keying the domain state
    pub authority: String,
}

/// Scheduler owns the visited set and per-domain state for one crawl run
///
/// The visited set only grows. A URL handed out by [`Scheduler::next_url`]
/// is already in it, so it can never be handed out again, whichever site
/// rediscovers it.
#[derive(Debug, Default)]
pub struct Scheduler {
    /// URLs already dequeued in this run
    visited: HashSet<Url>,

    /// URL currently between dequeue and completion
    visiting: Option<Url>,

    /// Per-domain state tracking
    domain_states: HashMap<String, DomainState>,

    /// Frontier entries discarded because they were already visited
    duplicates_skipped: u64,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Dequeues the next URL to visit
    ///
    /// Already-visited URLs are discarded without any I/O. The returned URL
    /// is moved to `Visiting` and inserted into the visited set before the
    /// caller fetches anything.
    ///
    /// Returns None when the frontier is exhausted.
    pub fn next_url(&mut self, frontier: &mut Frontier) -> Option<ScheduledUrl> {
        while let Some(url) = frontier.pop() {
            if self.visited.contains(&url) {
                tracing::trace!("Discarding already visited URL {}", url);
                self.duplicates_skipped += 1;
                continue;
            }

            let Some(authority) = extract_authority(&url) else {
                continue;
            };

            self.visited.insert(url.clone());
            self.visiting = Some(url.clone());
            tracing::trace!("{}: {} -> {}", url, PageState::Pending, PageState::Visiting);

            return Some(ScheduledUrl { url, authority });
        }

        None
    }

    /// Marks the URL currently being visited as finished
    pub fn finish(&mut self, url: &Url) {
        if self.visiting.as_ref() == Some(url) {
            self.visiting = None;
            tracing::trace!("{}: {} -> {}", url, PageState::Visiting, PageState::Visited);
        }
    }

    /// Adds discovered links to the frontier
    ///
    /// Links that were already visited or that fall outside the frontier's
    /// domain are skipped. Returns the number of URLs newly queued.
    pub fn enqueue_links<I>(&self, frontier: &mut Frontier, links: I) -> usize
    where
        I: IntoIterator<Item = Url>,
    {
        let mut added = 0;
        for link in links {
            if self.visited.contains(&link) {
                continue;
            }
            if frontier.push(link) {
                added += 1;
            }
        }
        added
    }

    /// Current state of a URL relative to this run
    pub fn page_state(&self, url: &Url, frontier: &Frontier) -> Option<PageState> {
        if self.visiting.as_ref() == Some(url) {
            Some(PageState::Visiting)
        } else if self.visited.contains(url) {
            Some(PageState::Visited)
        } else if frontier.contains(url) {
            Some(PageState::Pending)
        } else {
            None
        }
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    /// Number of URLs dequeued so far in this run
    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn duplicates_skipped(&self) -> u64 {
        self.duplicates_skipped
    }

    /// Returns the cached, still-fresh policy for a domain
    pub fn cached_policy(&self, authority: &str) -> Option<&CrawlPolicy> {
        self.domain_states
            .get(authority)
            .and_then(|state| state.fresh_policy())
    }

    /// Caches the policy fetched for a domain
    pub fn store_policy(&mut self, authority: &str, policy: CrawlPolicy) {
        self.domain_state_mut(authority).update_policy(policy);
    }

    /// Waits until the domain's politeness gate opens
    ///
    /// Returns the time actually spent waiting.
    pub async fn wait_for_turn(&self, authority: &str) -> Duration {
        let wait = self
            .domain_states
            .get(authority)
            .and_then(|state| state.time_until_next_fetch(Instant::now()));

        match wait {
            Some(wait) => {
                tracing::info!(
                    "Waiting {:.1}s before next request to {}",
                    wait.as_secs_f64(),
                    authority
                );
                tokio::time::sleep(wait).await;
                wait
            }
            None => Duration::ZERO,
        }
    }

    /// Records a page visit and closes the domain's gate for `delay`
    pub fn record_fetch(&mut self, authority: &str, delay: Duration) {
        self.domain_state_mut(authority).record_fetch(Instant::now(), delay);
    }

    /// Gets the domain state for a specific domain
    pub fn get_domain_state(&self, authority: &str) -> Option<&DomainState> {
        self.domain_states.get(authority)
    }

    fn domain_state_mut(&mut self, authority: &str) -> &mut DomainState {
        self.domain_states
            .entry(authority.to_string())
            .or_insert_with(DomainState::new)
    }
}
