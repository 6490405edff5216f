use crate::UrlError;
use url::Url;

/// Canonicalizes a URL into its visited-set key
///
/// # Canonicalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Reject schemes other than HTTP(S)
/// 3. Remove fragment (everything after #)
/// 4. Remove every trailing slash from the serialized form
///
/// Inline `data:` locators are returned unchanged, since their payload may
/// legitimately end in `/`.
///
/// Canonicalization is idempotent: feeding a canonical form back in returns
/// it unchanged.
///
/// # Examples
///
/// ```
/// use image_harvest::url::canonicalize;
///
/// let url = canonicalize("https://example.test/page/#intro").unwrap();
/// assert_eq!(url, "https://example.test/page");
/// ```
pub fn canonicalize(url_str: &str) -> Result<String, UrlError> {
    let trimmed = url_str.trim();

    if trimmed
        .get(..5)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("data:"))
    {
        return Ok(trimmed.to_string());
    }

    let mut url = Url::parse(trimmed).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    url.set_fragment(None);

    Ok(url.as_str().trim_end_matches('/').to_string())
}
