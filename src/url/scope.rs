use crate::url::{canonicalize, Locator};
use crate::UrlError;

/// The base-URL constraint bounding which page locators may be traversed
///
/// A locator is in scope when its canonical form starts with the canonical
/// base URL and the match ends on a path-segment boundary: the base is
/// followed by nothing, a `/`, a `?`, or the base itself ends in `/`.
///
/// This rejects sibling paths that merely share a string prefix, so
/// `https://example.test/abc` is outside the scope of
/// `https://example.test/ab`.
///
/// # Examples
///
/// ```
/// use image_harvest::url::{Locator, Scope};
///
/// let scope = Scope::new("https://example.test/docs/").unwrap();
/// assert!(scope.contains(&Locator::parse("https://example.test/docs/intro").unwrap()));
/// assert!(!scope.contains(&Locator::parse("https://example.test/docsearch").unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    base: String,
}

impl Scope {
    /// Builds a scope from a raw base URL
    pub fn new(base_url: &str) -> Result<Self, UrlError> {
        let base = canonicalize(base_url)?;
        Ok(Self { base })
    }

    /// The canonical base URL
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Returns true if the locator falls inside this scope
    pub fn contains(&self, locator: &Locator) -> bool {
        if locator.is_inline() {
            return false;
        }

        match locator.as_str().strip_prefix(self.base.as_str()) {
            Some(rest) => {
                rest.is_empty()
                    || rest.starts_with('/')
                    || rest.starts_with('?')
                    || self.base.ends_with('/')
            }
            None => false,
        }
    }
}
