//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests made outside the page renderer:
//! - Building the shared HTTP client from configuration
//! - HEAD requests to check Content-Type during classification
//! - GET requests for image bytes, bounded by the configured size limit
//! - GET requests for stylesheet text

use crate::config::HttpConfig;
use crate::HarvestError;
use reqwest::{header, redirect::Policy, Client, Response};
use std::time::Duration;

/// Body of a successful GET
#[derive(Debug)]
pub struct FetchedBody {
    /// Response bytes
    pub bytes: Vec<u8>,

    /// Content-Type header value, if present
    pub content_type: Option<String>,
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The HTTP client configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use image_harvest::config::HttpConfig;
/// use image_harvest::crawler::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .redirect(Policy::limited(config.max_redirects))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Sends a HEAD request and returns the response's Content-Type
///
/// No body is transferred. Redirects are followed by the client policy.
///
/// # Returns
///
/// * `Ok(Some(String))` - Content-Type header value
/// * `Ok(None)` - Successful response without a Content-Type header
/// * `Err(HarvestError)` - Transport failure or non-2xx status
pub async fn check_content_type(client: &Client, url: &str) -> Result<Option<String>, HarvestError> {
    let response = client
        .head(url)
        .send()
        .await
        .map_err(|source| http_error(url, source))?;
    let response = require_success(url, response)?;

    Ok(content_type(&response))
}

/// Fetches the raw bytes at a URL
///
/// When `max_bytes` is set, a declared Content-Length over the limit aborts
/// before the body is read, and a body that grows past the limit while
/// streaming aborts as soon as it does.
pub async fn fetch_bytes(
    client: &Client,
    url: &str,
    max_bytes: Option<u64>,
) -> Result<FetchedBody, HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| http_error(url, source))?;
    let mut response = require_success(url, response)?;

    if let (Some(limit), Some(declared)) = (max_bytes, response.content_length()) {
        if declared > limit {
            return Err(HarvestError::TooLarge {
                url: url.to_string(),
                size: declared,
                limit,
            });
        }
    }

    let content_type = content_type(&response);
    let mut bytes = Vec::new();

    while let Some(chunk) = response
        .chunk()
        .await
        .map_err(|source| http_error(url, source))?
    {
        bytes.extend_from_slice(&chunk);

        if let Some(limit) = max_bytes {
            if bytes.len() as u64 > limit {
                return Err(HarvestError::TooLarge {
                    url: url.to_string(),
                    size: bytes.len() as u64,
                    limit,
                });
            }
        }
    }

    Ok(FetchedBody {
        bytes,
        content_type,
    })
}

/// Fetches a URL as text (stylesheets, plain-HTTP page sources)
pub async fn fetch_text(client: &Client, url: &str) -> Result<(String, Option<String>), HarvestError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|source| http_error(url, source))?;
    let response = require_success(url, response)?;
    let content_type = content_type(&response);

    let text = response
        .text()
        .await
        .map_err(|source| http_error(url, source))?;

    Ok((text, content_type))
}

fn require_success(url: &str, response: Response) -> Result<Response, HarvestError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        Err(HarvestError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        })
    }
}

fn content_type(response: &Response) -> Option<String> {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
}

fn http_error(url: &str, source: reqwest::Error) -> HarvestError {
    HarvestError::Http {
        url: url.to_string(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client() -> Client {
        build_http_client(&HttpConfig::default()).unwrap()
    }

    #[test]
    fn test_build_http_client() {
        let config = HttpConfig {
            user_agent: "TestHarvester/1.0".to_string(),
            ..HttpConfig::default()
        };
        assert!(build_http_client(&config).is_ok());
    }

    #[tokio::test]
    async fn test_check_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path("/a.png"))
            .respond_with(ResponseTemplate::new(200).insert_header("content-type", "image/png"))
            .mount(&server)
            .await;

        let url = format!("{}/a.png", server.uri());
        let content_type = check_content_type(&test_client(), &url).await.unwrap();
        assert_eq!(content_type.as_deref(), Some("image/png"));
    }

    #[tokio::test]
    async fn test_check_content_type_404_is_error() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let url = format!("{}/missing.png", server.uri());
        let result = check_content_type(&test_client(), &url).await;
        assert!(matches!(result, Err(HarvestError::Status { status: 404, .. })));
    }

    #[tokio::test]
    async fn test_fetch_bytes_respects_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/big.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0u8; 64]))
            .mount(&server)
            .await;

        let url = format!("{}/big.png", server.uri());
        let result = fetch_bytes(&test_client(), &url, Some(16)).await;
        assert!(matches!(result, Err(HarvestError::TooLarge { limit: 16, .. })));

        let body = fetch_bytes(&test_client(), &url, Some(64)).await.unwrap();
        assert_eq!(body.bytes.len(), 64);
    }

    #[tokio::test]
    async fn test_fetch_text() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/site.css"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("body { background: url(bg.png); }", "text/css"),
            )
            .mount(&server)
            .await;

        let url = format!("{}/site.css", server.uri());
        let (text, content_type) = fetch_text(&test_client(), &url).await.unwrap();
        assert!(text.contains("bg.png"));
        assert_eq!(content_type.as_deref(), Some("text/css"));
    }
}
