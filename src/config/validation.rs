use crate::config::types::{Config, HttpConfig, RendererConfig, RendererKind, ScopeConfig};
use crate::ConfigError;
use url::Url;

/// Upper bound on redirect hops for any single fetch
const MAX_REDIRECT_LIMIT: usize = 20;

/// Validates the entire configuration
///
/// Runs before any crawl work starts; a failure here is the only
/// caller-visible crawl error.
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_scope(&config.scope)?;
    validate_renderer(&config.renderer)?;
    validate_http(&config.http)?;

    if config.crawl.timeout_secs == Some(0) {
        return Err(ConfigError::Validation(
            "crawl timeout-secs must be > 0 when set".to_string(),
        ));
    }

    Ok(())
}

/// Validates the crawl scope
fn validate_scope(scope: &ScopeConfig) -> Result<(), ConfigError> {
    let base_url = scope.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }

    validate_http_url(base_url, "base-url")?;

    if scope.max_image_size == 0 {
        return Err(ConfigError::Validation(
            "max-image-size must be > 0".to_string(),
        ));
    }

    for ext in &scope.allowed_extensions {
        let ext = ext.trim().trim_start_matches('.');
        if ext.is_empty() || !ext.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ConfigError::Validation(format!(
                "allowed-extensions entries must be alphanumeric, got '{}'",
                ext
            )));
        }
    }

    Ok(())
}

/// Validates renderer configuration
fn validate_renderer(config: &RendererConfig) -> Result<(), ConfigError> {
    if config.page_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "page-timeout-secs must be > 0".to_string(),
        ));
    }

    if config.kind == RendererKind::Webdriver {
        validate_http_url(&config.webdriver_url, "webdriver-url")?;
    }

    Ok(())
}

/// Validates HTTP client configuration
fn validate_http(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user-agent cannot be empty".to_string(),
        ));
    }

    if config.request_timeout_secs == 0 || config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "request and connect timeouts must be > 0".to_string(),
        ));
    }

    if config.max_redirects > MAX_REDIRECT_LIMIT {
        return Err(ConfigError::Validation(format!(
            "max-redirects must be <= {}, got {}",
            MAX_REDIRECT_LIMIT, config.max_redirects
        )));
    }

    Ok(())
}

/// Validates that a value is an absolute HTTP(S) URL
fn validate_http_url(value: &str, field: &str) -> Result<(), ConfigError> {
    let url = Url::parse(value)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid {} '{}': {}", field, value, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' must use HTTP or HTTPS",
            field, value
        )));
    }

    if url.host_str().is_none() {
        return Err(ConfigError::InvalidUrl(format!(
            "{} '{}' has no host",
            field, value
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Config {
        Config::with_scope(ScopeConfig::new("https://example.test/"))
    }

    #[test]
    fn test_valid_config() {
        assert!(validate(&valid_config()).is_ok());
    }

    #[test]
    fn test_missing_base_url() {
        let mut config = valid_config();
        config.scope.base_url = "   ".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::MissingBaseUrl)));
    }

    #[test]
    fn test_invalid_base_url() {
        let mut config = valid_config();
        config.scope.base_url = "not a url".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));

        config.scope.base_url = "ftp://example.test/".to_string();
        assert!(matches!(validate(&config), Err(ConfigError::InvalidUrl(_))));
    }

    #[test]
    fn test_zero_image_size() {
        let mut config = valid_config();
        config.scope.max_image_size = 0;
        assert!(matches!(validate(&config), Err(ConfigError::Validation(_))));
    }

    #[test]
    fn test_bad_extension() {
        let mut config = valid_config();
        config.scope.allowed_extensions = vec!["p/ng".to_string()];
        assert!(validate(&config).is_err());

        config.scope.allowed_extensions = vec![".png".to_string(), "webp".to_string()];
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_zero_page_timeout() {
        let mut config = valid_config();
        config.renderer.page_timeout_secs = 0;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_webdriver_url_checked_only_for_webdriver() {
        let mut config = valid_config();
        config.renderer.webdriver_url = "nope".to_string();
        assert!(validate(&config).is_err());

        config.renderer.kind = RendererKind::Http;
        assert!(validate(&config).is_ok());
    }

    #[test]
    fn test_redirect_limit() {
        let mut config = valid_config();
        config.http.max_redirects = 21;
        assert!(validate(&config).is_err());
    }

    #[test]
    fn test_zero_crawl_timeout() {
        let mut config = valid_config();
        config.crawl.timeout_secs = Some(0);
        assert!(validate(&config).is_err());
    }
}
