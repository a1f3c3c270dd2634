//! Robots.txt parser implementation
//!
//! Only two directives are read: `User-agent` and `Crawl-delay`. Path rules
//! (`Allow`/`Disallow`) are not interpreted here; they are kept in the raw
//! document and only evaluated when strict mode is requested through
//! [`CrawlPolicy::permits`], using the robotstxt crate's matcher.

use robotstxt::DefaultMatcher;
use std::time::Duration;
use url::Url;

/// The user-agent token denoting every crawler
pub const WILDCARD_AGENT: &str = "*";

/// Longest crawl delay honoured; larger declared values are clamped to it
pub const MAX_CRAWL_DELAY: Duration = Duration::from_secs(24 * 60 * 60);

/// Crawl policy for one domain
#[derive(Debug, Clone, PartialEq)]
pub struct CrawlPolicy {
    /// Whether the domain may be crawled at all
    pub allowed: bool,

    /// Politeness delay between two page visits
    pub delay: Duration,

    /// Raw robots.txt body, kept for path-level checks
    document: Option<String>,
}

impl CrawlPolicy {
    /// Builds a policy from a successfully fetched robots.txt body
    ///
    /// The domain is allowed; the delay is the wildcard block's
    /// `Crawl-delay` if present, otherwise `default_delay`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use sumi_glean::robots::CrawlPolicy;
    ///
    /// let policy = CrawlPolicy::parse("User-agent: *\nCrawl-delay: 3", Duration::from_secs(2));
    /// assert!(policy.allowed);
    /// assert_eq!(policy.delay, Duration::from_secs(3));
    /// ```
    pub fn parse(content: &str, default_delay: Duration) -> Self {
        Self {
            allowed: true,
            delay: wildcard_crawl_delay(content).unwrap_or(default_delay),
            document: Some(content.to_string()),
        }
    }

    /// Policy used when robots.txt could not be retrieved: deny, default delay
    pub fn unreachable(default_delay: Duration) -> Self {
        Self {
            allowed: false,
            delay: default_delay,
            document: None,
        }
    }

    /// Returns true if `url` may be fetched under this policy
    ///
    /// With `respect_disallow` off, this is just [`CrawlPolicy::allowed`].
    /// With it on, the wildcard agent's path rules must also admit the URL.
    pub fn permits(&self, url: &Url, respect_disallow: bool) -> bool {
        if !self.allowed {
            return false;
        }
        if !respect_disallow {
            return true;
        }

        match self.document.as_deref() {
            Some(body) if !body.trim().is_empty() => {
                let mut matcher = DefaultMatcher::default();
                matcher.one_agent_allowed_by_robots(body, WILDCARD_AGENT, url.as_str())
            }
            _ => true,
        }
    }
}

/// Extracts the wildcard agent's crawl delay from a robots.txt body
///
/// Lines are scanned in order. A `Crawl-delay` binds to the most recently
/// seen `User-agent`; each new `User-agent` line replaces the previous one.
/// Values that are not finite non-negative numbers are ignored, and values
/// above [`MAX_CRAWL_DELAY`] are clamped to it. When the
/// wildcard block declares several delays the last one wins.
pub fn wildcard_crawl_delay(content: &str) -> Option<Duration> {
    let mut current_agent: Option<String> = None;
    let mut delay = None;

    for line in content.lines() {
        let Some((key, value)) = parse_directive(line) else {
            continue;
        };

        match key.as_str() {
            "user-agent" => current_agent = Some(value.to_string()),
            "crawl-delay" if current_agent.as_deref() == Some(WILDCARD_AGENT) => {
                if let Some(parsed) = parse_delay(value) {
                    delay = Some(parsed);
                }
            }
            _ => {}
        }
    }

    delay
}

/// Splits a line into a lowercase key and a trimmed value
///
/// Comments (`#` to end of line) and blank lines yield None.
fn parse_directive(line: &str) -> Option<(String, &str)> {
    let line = match line.find('#') {
        Some(idx) => &line[..idx],
        None => line,
    };
    let (key, value) = line.trim().split_once(':')?;
    Some((key.trim().to_lowercase(), value.trim()))
}

fn parse_delay(value: &str) -> Option<Duration> {
    let seconds: f64 = value.parse().ok()?;
    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }
    if seconds >= MAX_CRAWL_DELAY.as_secs_f64() {
        return Some(MAX_CRAWL_DELAY);
    }
    Duration::try_from_secs_f64(seconds).ok()
}
