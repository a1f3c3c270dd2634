//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `PageState`: where a URL is in its single pass through the crawl
//!   (pending, visiting, visited)
//! - `DomainState`: per-domain politeness gate and cached crawl policy

mod domain_state;
mod page_state;

// Re-export main types
pub use domain_state::DomainState;
pub use page_state::PageState;
