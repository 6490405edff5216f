//! URL handling module for Image-Harvest
//!
//! This module provides locator canonicalization, relative-reference
//! resolution, inline data parsing, and the base-URL scope test.

mod link;
mod locator;
mod normalize;
mod scope;

pub use link::Link;
pub use locator::{InlineData, Locator};
pub use normalize::canonicalize;
pub use scope::Scope;

use url::Url;

/// Resolves a raw attribute value against a base URL into a locator
///
/// Returns None if the reference should be ignored:
/// - empty values and fragment-only references (same page anchors)
/// - `javascript:`, `mailto:` and `tel:` schemes
/// - references that fail to resolve, or resolve to a non-HTTP(S) URL
///
/// Inline `data:` references are kept verbatim.
///
/// # Examples
///
/// ```
/// use image_harvest::url::resolve;
/// use url::Url;
///
/// let base = Url::parse("https://example.test/gallery/").unwrap();
/// let locator = resolve("../a.png#top", &base).unwrap();
/// assert_eq!(locator.as_str(), "https://example.test/a.png");
/// ```
pub fn resolve(href: &str, base: &Url) -> Option<Locator> {
    match join_reference(href, base)? {
        Reference::Inline(locator) => Some(locator),
        Reference::Remote(url) => canonicalize(url.as_str()).ok().map(Locator::remote),
    }
}

/// Resolves a raw attribute value into a remote [`Link`]
///
/// Applies the same skips as [`resolve`] and also drops inline data, which
/// can never be fetched as a page or stylesheet.
pub fn resolve_link(href: &str, base: &Url) -> Option<Link> {
    match join_reference(href, base)? {
        Reference::Inline(_) => None,
        Reference::Remote(url) => Link::new(url).ok(),
    }
}

enum Reference {
    Inline(Locator),
    Remote(Url),
}

fn join_reference(href: &str, base: &Url) -> Option<Reference> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
    {
        return None;
    }

    if lowered.starts_with("data:") {
        return Some(Reference::Inline(Locator::inline(href)));
    }

    let joined = base.join(href).ok()?;
    if joined.scheme() != "http" && joined.scheme() != "https" {
        return None;
    }

    Some(Reference::Remote(joined))
}
