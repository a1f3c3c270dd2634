//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with the crawler's user agent and timeout
//! - GET requests for page content
//! - Classifying failures so callers can log and move on
//!
//! There is no retry logic: every request is attempted exactly once.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// The server answered with a 2xx status
    Success {
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// The server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
        /// Page body content (error pages still carry markup)
        body: String,
    },

    /// No usable response (connection refused, DNS failure, timeout, bad body)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Returns any body the server sent, whatever the status
    pub fn any_body(self) -> Option<String> {
        match self {
            Self::Success { body, .. } | Self::HttpError { body, .. } => Some(body),
            Self::NetworkError { .. } => None,
        }
    }

    /// Short description of a failure, for log lines
    pub fn describe(&self) -> String {
        match self {
            Self::Success { status_code, .. } => format!("HTTP {}", status_code),
            Self::HttpError { status_code, .. } => format!("HTTP {}", status_code),
            Self::NetworkError { error } => error.clone(),
        }
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Total timeout applied to every request
///
/// # Example
///
/// ```no_run
/// use std::time::Duration;
/// use sumi_glean::config::UserAgentConfig;
/// use sumi_glean::crawler::build_http_client;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL with a single GET request
///
/// Redirects are followed by the client. Timeouts and connection failures
/// are reported as [`FetchResult::NetworkError`]; they never panic or
/// propagate.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_error(e),
    };

    let status = response.status();

    let body = match response.text().await {
        Ok(body) => body,
        Err(e) => return classify_error(e),
    };

    if status.is_success() {
        FetchResult::Success {
            status_code: status.as_u16(),
            body,
        }
    } else {
        FetchResult::HttpError {
            status_code: status.as_u16(),
            body,
        }
    }
}

fn classify_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
