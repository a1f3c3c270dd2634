//! HTML parser for extracting links and selector content
//!
//! Both extractors work on a parsed [`Html`] document; the functions here are
//! pure and do no I/O.

use crate::output::ExtractedRecord;
use crate::url::{in_scope, normalize_url};
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashSet;
use url::Url;

/// Maximum number of elements taken per selector per page
pub const MAX_MATCHES_PER_SELECTOR: usize = 5;

/// Elements whose text is never visible
const INVISIBLE_ELEMENTS: &[&str] = &["script", "style", "noscript", "template"];

/// Extracts every in-scope hyperlink from an HTML document
///
/// # Link Extraction Rules
///
/// - Every `<a href="...">` is resolved against `base_url`
/// - `javascript:`, `mailto:`, `tel:` and `data:` hrefs are skipped
/// - Only HTTP(S) results are kept, with their fragment removed
/// - Only links whose authority ends with `domain` are kept
///
/// # Example
///
/// ```
/// use sumi_glean::crawler::parse_links;
/// use url::Url;
///
/// let html = r#"<a href="/about">About</a><a href="https://other.test/">Other</a>"#;
/// let base = Url::parse("https://example.test/").unwrap();
/// let links = parse_links(html, &base, "example.test");
/// assert_eq!(links.len(), 1);
/// ```
pub fn parse_links(html: &str, base_url: &Url, domain: &str) -> HashSet<Url> {
    let document = Html::parse_document(html);
    let mut links = HashSet::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if let Some(url) = resolve_link(href, base_url) {
            if in_scope(&url, domain) {
                links.insert(url);
            }
        }
    }

    links
}

/// Resolves a link href to an absolute, normalized URL
///
/// Returns None if the link should be excluded:
/// - empty hrefs
/// - javascript:, mailto:, tel: and data: schemes
/// - anything that does not resolve to an HTTP(S) URL with a host
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_url(absolute.as_str()).ok()
}

/// Extracts selector matches from an HTML document
///
/// Selectors are applied in the given order. For each one, the first
/// [`MAX_MATCHES_PER_SELECTOR`] matching elements in document order are
/// taken, and each yields a record unless its visible text is empty after
/// trimming. The cap counts elements, so a selector whose first five matches
/// are all blank yields nothing even if a sixth match has text.
///
/// Invalid selectors are logged and skipped.
pub fn parse_content(html: &str, source_url: &str, selectors: &[String]) -> Vec<ExtractedRecord> {
    let document = Html::parse_document(html);
    let mut records = Vec::new();

    for raw in selectors {
        let selector = match Selector::parse(raw) {
            Ok(selector) => selector,
            Err(e) => {
                tracing::warn!("Skipping invalid selector '{}': {:?}", raw, e);
                continue;
            }
        };

        for element in document.select(&selector).take(MAX_MATCHES_PER_SELECTOR) {
            let text = visible_text(element);
            if !text.is_empty() {
                records.push(ExtractedRecord::new(source_url, raw.as_str(), text));
            }
        }
    }

    records
}

/// Collects the visible text below an element
///
/// Each text node is trimmed, blank nodes are dropped, and the rest are
/// joined with a single space. Text inside script-like elements is ignored.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    for node in element.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .map(|el| INVISIBLE_ELEMENTS.contains(&el.name()))
                .unwrap_or(false)
        });
        if hidden {
            continue;
        }

        let trimmed = text.trim();
        if !trimmed.is_empty() {
            parts.push(trimmed);
        }
    }

    parts.join(" ")
}
