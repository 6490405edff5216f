use crate::url::canonicalize;
use crate::UrlError;
use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use url::Url;

/// Inline locators longer than this are elided in log lines
const ABBREVIATE_AFTER: usize = 64;

/// Inline payloads in the wild frequently omit `=` padding
const LENIENT_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Canonical identifier for a page, stylesheet, or image resource
///
/// A locator is either a canonicalized absolute HTTP(S) URL or a verbatim
/// inline `data:` reference. Pages, stylesheets and images share one
/// namespace of locators in the visited set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Locator(String);

impl Locator {
    /// Parses and canonicalizes a raw URL or data reference
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        canonicalize(raw).map(Self)
    }

    /// Wraps an already-canonical remote URL
    pub(crate) fn remote(canonical: String) -> Self {
        Self(canonical)
    }

    /// Wraps an inline data reference verbatim
    pub(crate) fn inline(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true for inline `data:` locators
    pub fn is_inline(&self) -> bool {
        self.0
            .get(..5)
            .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    }

    /// Parses the inline payload of a `data:` locator
    ///
    /// Returns None for remote locators.
    pub fn inline_data(&self) -> Option<Result<InlineData<'_>, UrlError>> {
        self.is_inline().then(|| InlineData::parse(&self.0))
    }

    /// Returns the locator as a parsed URL (None for inline locators)
    pub fn to_url(&self) -> Option<Url> {
        if self.is_inline() {
            return None;
        }
        Url::parse(&self.0).ok()
    }

    /// A short form for log lines; long inline payloads are elided
    pub fn abbreviated(&self) -> Cow<'_, str> {
        if !self.is_inline() || self.0.len() <= ABBREVIATE_AFTER {
            return Cow::Borrowed(&self.0);
        }

        let header = self.0.split_once(',').map(|(h, _)| h).unwrap_or("data:");
        let header: String = header.chars().take(ABBREVIATE_AFTER).collect();
        Cow::Owned(format!("{},... ({} chars)", header, self.0.len()))
    }

    /// Returns the last non-empty path segment, percent-decoded
    ///
    /// Query and fragment are not part of the basename. Inline locators and
    /// bare origins have no basename.
    pub fn basename(&self) -> Option<String> {
        let url = self.to_url()?;
        let segment = url.path_segments()?.filter(|s| !s.is_empty()).last()?;
        let decoded = urlencoding::decode(segment)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| segment.to_string());
        Some(decoded)
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Locator {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The parsed parts of a `data:` reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineData<'a> {
    /// Declared MIME type, lowercased (`text/plain` when omitted)
    pub mime: String,

    /// Whether the payload is base64 encoded
    pub is_base64: bool,

    /// The raw payload after the first comma
    pub payload: &'a str,
}

impl<'a> InlineData<'a> {
    /// Parses `data:[<mime>][;param]*[;base64],<payload>`
    pub fn parse(raw: &'a str) -> Result<Self, UrlError> {
        let rest = raw
            .get(5..)
            .filter(|_| raw[..5].eq_ignore_ascii_case("data:"))
            .ok_or_else(|| UrlError::MalformedData("missing data: scheme".to_string()))?;

        let (meta, payload) = rest
            .split_once(',')
            .ok_or_else(|| UrlError::MalformedData("missing ',' separator".to_string()))?;

        let mut params = meta.split(';');
        let mime = params
            .next()
            .map(|m| m.trim().to_ascii_lowercase())
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| "text/plain".to_string());
        let is_base64 = params.any(|p| p.trim().eq_ignore_ascii_case("base64"));

        Ok(Self {
            mime,
            is_base64,
            payload,
        })
    }

    /// Returns true if the declared MIME type is an image type
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }

    /// Returns true for inline SVG documents
    pub fn is_svg(&self) -> bool {
        self.subtype() == "svg"
    }

    /// MIME subtype without structured-syntax suffix (`svg+xml` -> `svg`)
    pub fn subtype(&self) -> &str {
        let subtype = self.mime.split_once('/').map(|(_, s)| s).unwrap_or("");
        subtype.split('+').next().unwrap_or(subtype)
    }

    /// Decodes the payload into raw bytes
    pub fn decode(&self) -> Result<Vec<u8>, UrlError> {
        if self.is_base64 {
            let compact: String = self
                .payload
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect();
            let compact = urlencoding::decode(&compact)
                .map(|s| s.into_owned())
                .unwrap_or(compact);
            LENIENT_BASE64
                .decode(compact.as_bytes())
                .map_err(|e| UrlError::MalformedData(e.to_string()))
        } else {
            Ok(urlencoding::decode_binary(self.payload.as_bytes()).into_owned())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_canonicalizes() {
        let locator = Locator::parse("https://example.test/a/#x").unwrap();
        assert_eq!(locator.as_str(), "https://example.test/a");
        assert!(!locator.is_inline());
    }

    #[test]
    fn test_basename() {
        let locator = Locator::parse("https://example.test/img/cat%20one.png?v=2").unwrap();
        assert_eq!(locator.basename(), Some("cat one.png".to_string()));
    }

    #[test]
    fn test_basename_of_origin_is_none() {
        let locator = Locator::parse("https://example.test/").unwrap();
        assert_eq!(locator.basename(), None);
    }

    #[test]
    fn test_inline_base64() {
        let locator = Locator::inline("data:image/png;base64,aGVsbG8=");
        let data = locator.inline_data().unwrap().unwrap();
        assert_eq!(data.mime, "image/png");
        assert!(data.is_base64);
        assert!(data.is_image());
        assert_eq!(data.subtype(), "png");
        assert_eq!(data.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_inline_unpadded_base64() {
        let data = InlineData::parse("data:image/gif;base64,aGVsbG8").unwrap();
        assert_eq!(data.decode().unwrap(), b"hello");
    }

    #[test]
    fn test_inline_svg_percent_encoded() {
        let data = InlineData::parse("data:image/svg+xml,%3Csvg%3E%3C/svg%3E").unwrap();
        assert!(data.is_svg());
        assert!(!data.is_base64);
        assert_eq!(data.decode().unwrap(), b"<svg></svg>");
    }

    #[test]
    fn test_inline_defaults_to_text_plain() {
        let data = InlineData::parse("data:,hello").unwrap();
        assert_eq!(data.mime, "text/plain");
        assert!(!data.is_image());
    }

    #[test]
    fn test_inline_missing_comma() {
        assert!(InlineData::parse("data:image/png;base64").is_err());
    }

    #[test]
    fn test_abbreviated() {
        let remote = Locator::parse("https://example.test/a.png").unwrap();
        assert_eq!(remote.abbreviated(), "https://example.test/a.png");

        let raw = format!("data:image/png;base64,{}", "A".repeat(200));
        let inline = Locator::inline(&raw);
        assert_eq!(inline.abbreviated(), "data:image/png;base64,... (222 chars)");
    }

    #[test]
    fn test_remote_has_no_inline_data() {
        let locator = Locator::parse("https://example.test/a.png").unwrap();
        assert!(locator.inline_data().is_none());
    }
}
