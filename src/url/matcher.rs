/// Checks whether a candidate authority belongs to the crawl domain
///
/// This is a plain textual suffix test, not a label-aware comparison:
/// `notexample.com` is accepted for the domain `example.com`. Both arguments
/// are expected to be lowercase already.
///
/// # Examples
///
/// ```
/// use sumi_glean::url::is_same_domain;
///
/// assert!(is_same_domain("example.com", "example.com"));
/// assert!(is_same_domain("blog.example.com", "example.com"));
/// assert!(!is_same_domain("example.org", "example.com"));
/// ```
pub fn is_same_domain(candidate: &str, domain: &str) -> bool {
    candidate.ends_with(domain)
}
