use crate::url::{canonicalize, Locator};
use crate::UrlError;
use url::Url;

/// A remote reference as it was discovered, paired with its canonical locator
///
/// The locator is the visited-set key. The URL keeps its trailing slash, so
/// it is what gets fetched and what relative references resolve against:
/// `intro` on `https://example.test/docs/` is `/docs/intro`, not `/intro`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// Canonical form, used for deduplication and scope tests
    pub locator: Locator,

    /// Absolute URL with the fragment removed
    pub url: Url,
}

impl Link {
    /// Builds a link from an absolute HTTP(S) URL
    pub fn new(mut url: Url) -> Result<Self, UrlError> {
        url.set_fragment(None);
        let locator = Locator::remote(canonicalize(url.as_str())?);
        Ok(Self { locator, url })
    }

    /// Parses a raw absolute URL
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::new(url)
    }
}
