use serde::Deserialize;
use std::time::Duration;

/// Fallback politeness delay when robots.txt declares none (seconds)
pub const DEFAULT_DELAY_SECS: u64 = 2;

/// Timeout applied to every HTTP request (seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Main configuration structure for Sumi-Glean
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent", default)]
    pub user_agent: UserAgentConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(rename = "target", default)]
    pub targets: Vec<TargetEntry>,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Delay between page visits when robots.txt has no wildcard crawl-delay
    #[serde(rename = "default-delay-secs", default = "default_delay_secs")]
    pub default_delay_secs: u64,

    /// Timeout for robots.txt and page requests
    #[serde(rename = "request-timeout-secs", default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Honour path-level Allow/Disallow rules for the generic agent
    #[serde(rename = "respect-disallow", default)]
    pub respect_disallow: bool,

    /// Maximum number of pages visited per target (unbounded when absent)
    #[serde(rename = "max-pages", default)]
    pub max_pages: Option<u32>,
}

impl CrawlerConfig {
    pub fn default_delay(&self) -> Duration {
        Duration::from_secs(self.default_delay_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            default_delay_secs: DEFAULT_DELAY_SECS,
            request_timeout_secs: DEFAULT_REQUEST_TIMEOUT_SECS,
            respect_disallow: false,
            max_pages: None,
        }
    }
}

fn default_delay_secs() -> u64 {
    DEFAULT_DELAY_SECS
}

fn default_request_timeout_secs() -> u64 {
    DEFAULT_REQUEST_TIMEOUT_SECS
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name", default = "default_crawler_name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version", default = "default_crawler_version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url", default)]
    pub contact_url: Option<String>,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value
    ///
    /// Format: `CrawlerName/Version` or `CrawlerName/Version (+ContactURL)`
    pub fn header_value(&self) -> String {
        match &self.contact_url {
            Some(contact) => format!(
                "{}/{} (+{})",
                self.crawler_name, self.crawler_version, contact
            ),
            None => format!("{}/{}", self.crawler_name, self.crawler_version),
        }
    }
}

impl Default for UserAgentConfig {
    fn default() -> Self {
        Self {
            crawler_name: default_crawler_name(),
            crawler_version: default_crawler_version(),
            contact_url: None,
        }
    }
}

fn default_crawler_name() -> String {
    "SumiGlean".to_string()
}

fn default_crawler_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Path to the CSV file receiving extracted records
    #[serde(rename = "csv-path", default = "default_csv_path")]
    pub csv_path: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

fn default_csv_path() -> String {
    "scraped_data.csv".to_string()
}

/// A site to crawl and the selectors to extract from each of its pages
#[derive(Debug, Clone, Deserialize)]
pub struct TargetEntry {
    /// Seed URL; its authority bounds the crawl
    pub url: String,

    /// CSS selectors, applied in order
    pub selectors: Vec<String>,
}
