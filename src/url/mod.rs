//! URL handling module for Sumi-Glean
//!
//! This module provides URL normalization, authority extraction and the
//! same-domain containment test that bounds every crawl.

mod domain;
mod matcher;
mod normalize;

// Re-export main functions
pub use domain::extract_authority;
pub use matcher::is_same_domain;
pub use normalize::normalize_url;

use url::Url;

/// Returns true if `url` belongs to the crawl scope rooted at `domain`
///
/// URLs without a host are never in scope.
pub fn in_scope(url: &Url, domain: &str) -> bool {
    extract_authority(url)
        .map(|authority| is_same_domain(&authority, domain))
        .unwrap_or(false)
}
