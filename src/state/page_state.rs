/// Page state definitions for tracking crawl progress
///
/// A URL moves through these states at most once per crawl run.
use std::fmt;

/// Represents the current state of a page in the crawl process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageState {
    /// Page is in the frontier, waiting to be dequeued
    Pending,

    /// Page was dequeued; policy check and extraction are in progress
    Visiting,

    /// Page is in the visited set and will never be fetched again
    Visited,
}

impl PageState {
    /// Returns a short lowercase label used in log lines
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Visiting => "visiting",
            Self::Visited => "visited",
        }
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
