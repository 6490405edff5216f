//! HTML link extraction
//!
//! This module turns a rendered page into three candidate lists:
//! - Image locators (from `<img src>` and inline `url(...)` styles)
//! - Stylesheet locators (from `<link rel="stylesheet" href>`)
//! - Page locators (from `<a href>`)
//!
//! Extraction is a pure function of the page source and its URL. Scope and
//! visited filtering belong to the coordinator.

use crate::crawler::css::scan_stylesheet;
use crate::url::{resolve, resolve_link, Link, Locator};
use scraper::{Html, Selector};
use url::Url;

/// Candidate locators found on one page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedLinks {
    /// Image candidates, remote or inline
    pub images: Vec<Locator>,

    /// Linked stylesheets (remote only)
    pub stylesheets: Vec<Link>,

    /// Anchor targets (remote only)
    pub pages: Vec<Link>,
}

/// Extracts image, stylesheet and page locators from page HTML
///
/// # Extraction Rules
///
/// **Images:**
/// - `<img src="...">`, including inline `data:` sources
/// - `url(...)` references inside `<style>` blocks and `style` attributes
///
/// **Stylesheets:**
/// - `<link rel="stylesheet" href="...">` (rel matched as a token list)
///
/// **Pages:**
/// - `<a href="...">`
///
/// **Exclude everywhere:**
/// - `javascript:`, `mailto:`, `tel:` links and fragment-only references
/// - Inline data for stylesheets and pages
///
/// # Arguments
///
/// * `html` - The rendered page source
/// * `page_url` - The page's URL, the base for relative references
///
/// # Example
///
/// ```
/// use image_harvest::crawler::extract_links;
/// use url::Url;
///
/// let html = r#"<img src="/a.png"><link rel="stylesheet" href="s.css"><a href="/next">n</a>"#;
/// let page = Url::parse("https://example.test/").unwrap();
/// let links = extract_links(html, &page);
/// assert_eq!(links.images[0].as_str(), "https://example.test/a.png");
/// assert_eq!(links.stylesheets[0].url.as_str(), "https://example.test/s.css");
/// assert_eq!(links.pages[0].url.as_str(), "https://example.test/next");
/// ```
pub fn extract_links(html: &str, page_url: &Url) -> ExtractedLinks {
    let document = Html::parse_document(html);
    let mut links = ExtractedLinks::default();

    // Extract images from <img> tags
    if let Ok(img_selector) = Selector::parse("img[src]") {
        for element in document.select(&img_selector) {
            if let Some(src) = element.value().attr("src") {
                if let Some(locator) = resolve(src, page_url) {
                    links.images.push(locator);
                }
            }
        }
    }

    // Extract images referenced from embedded styles
    if let Ok(style_selector) = Selector::parse("style") {
        for element in document.select(&style_selector) {
            let css = element.text().collect::<String>();
            links.images.extend(scan_stylesheet(&css, page_url));
        }
    }

    if let Ok(styled_selector) = Selector::parse("[style]") {
        for element in document.select(&styled_selector) {
            if let Some(css) = element.value().attr("style") {
                links.images.extend(scan_stylesheet(css, page_url));
            }
        }
    }

    // Extract linked stylesheets
    if let Ok(link_selector) = Selector::parse("link[rel][href]") {
        for element in document.select(&link_selector) {
            let is_stylesheet = element.value().attr("rel").is_some_and(|rel| {
                rel.split_ascii_whitespace()
                    .any(|token| token.eq_ignore_ascii_case("stylesheet"))
            });
            if !is_stylesheet {
                continue;
            }

            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_link(href, page_url) {
                    links.stylesheets.push(link);
                }
            }
        }
    }

    // Extract page links from <a> tags
    if let Ok(a_selector) = Selector::parse("a[href]") {
        for element in document.select(&a_selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(link) = resolve_link(href, page_url) {
                    links.pages.push(link);
                }
            }
        }
    }

    links
}
