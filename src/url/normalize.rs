use crate::UrlError;
use url::Url;

/// Normalizes a URL into the form used as the frontier and visited-set key
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed (parsing also lowercases the scheme
///    and host and turns an empty path into `/`)
/// 2. Require an HTTP or HTTPS scheme
/// 3. Require a host
/// 4. Remove the fragment
///
/// Nothing else is canonicalized: trailing slashes, query order and `www.`
/// prefixes are kept, so `/a` and `/a/` are distinct pages.
///
/// # Examples
///
/// ```
/// use sumi_glean::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.com/page/#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page/");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingDomain);
    }

    url.set_fragment(None);

    Ok(url)
}
