//! Stylesheet scanning for image references
//!
//! Every `url(...)` reference in a stylesheet is a candidate image. Candidates
//! are resolved relative to the stylesheet's own URL and then classified like
//! any other image locator. Unparseable content yields no candidates.

use crate::url::{resolve, Locator};
use regex::Regex;
use std::sync::OnceLock;
use url::Url;

fn url_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r#"url\(\s*(?:"([^"]*)"|'([^']*)'|([^)]*?))\s*\)"#).expect("valid url() pattern")
    })
}

fn comment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid comment pattern"))
}

/// Extracts image candidates from stylesheet text
///
/// # Arguments
///
/// * `css` - The stylesheet text
/// * `base` - The stylesheet's own URL, for resolving relative references
///
/// # Example
///
/// ```
/// use image_harvest::crawler::scan_stylesheet;
/// use url::Url;
///
/// let base = Url::parse("https://example.test/css/site.css").unwrap();
/// let found = scan_stylesheet(".hero { background: url('../img/hero.jpg') }", &base);
/// assert_eq!(found[0].as_str(), "https://example.test/img/hero.jpg");
/// ```
pub fn scan_stylesheet(css: &str, base: &Url) -> Vec<Locator> {
    let without_comments = comment_pattern().replace_all(css, "");

    url_pattern()
        .captures_iter(&without_comments)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .filter_map(|m| resolve(m.as_str(), base))
        .collect()
}
