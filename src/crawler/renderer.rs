//! Page renderers
//!
//! A renderer turns a page URL into its fully loaded HTML source. Two are
//! provided:
//! - `WebDriverRenderer` drives one long-lived headless browser session
//! - `HttpRenderer` issues a plain GET and performs no script execution
//!
//! Sessions are opened once per crawl and must be released with `close`
//! whether or not the crawl succeeded.

use crate::config::{Config, RendererConfig, RendererKind};
use crate::crawler::fetcher::fetch_text;
use crate::HarvestError;
use fantoccini::wd::TimeoutConfiguration;
use fantoccini::{Client as WebDriverClient, ClientBuilder};
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::future::Future;
use std::time::Duration;

/// Produces the rendered DOM of a page
pub trait PageRenderer: Send + Sync {
    fn render(&self, url: &str) -> impl Future<Output = Result<String, HarvestError>> + Send;
}

/// Headless browser session over WebDriver
pub struct WebDriverRenderer {
    client: WebDriverClient,
}

impl WebDriverRenderer {
    /// Connects to the WebDriver endpoint and starts a browser session
    pub async fn connect(config: &RendererConfig) -> Result<Self, HarvestError> {
        let mut builder = ClientBuilder::native();
        builder.capabilities(browser_capabilities(config.headless));

        let client = builder.connect(&config.webdriver_url).await.map_err(|e| {
            HarvestError::Session(format!(
                "could not connect to WebDriver at {}: {}",
                config.webdriver_url, e
            ))
        })?;

        // The browser must abandon a stalled navigation itself; dropping the
        // goto future leaves the session busy for the next page
        if let Err(e) = client.update_timeouts(page_load_timeouts(config)).await {
            let _ = client.close().await;
            return Err(HarvestError::Session(format!(
                "could not set page load timeout: {}",
                e
            )));
        }

        tracing::info!("Connected to WebDriver at {}", config.webdriver_url);
        Ok(Self { client })
    }

    /// Ends the browser session
    pub async fn close(self) {
        if let Err(e) = self.client.close().await {
            tracing::warn!("Failed to close WebDriver session: {}", e);
        }
    }
}

impl PageRenderer for WebDriverRenderer {
    async fn render(&self, url: &str) -> Result<String, HarvestError> {
        self.client
            .goto(url)
            .await
            .map_err(|e| render_error(url, e))?;

        self.client.source().await.map_err(|e| render_error(url, e))
    }
}

fn page_load_timeouts(config: &RendererConfig) -> TimeoutConfiguration {
    let page_load = Duration::from_secs(config.page_timeout_secs);
    TimeoutConfiguration::new(None, Some(page_load), None)
}

/// Headless options for both Chromium- and Gecko-based drivers
fn browser_capabilities(headless: bool) -> Map<String, Value> {
    let mut chrome_args = vec!["--disable-gpu", "--disable-dev-shm-usage", "--no-sandbox"];
    let mut firefox_args = Vec::new();
    if headless {
        chrome_args.push("--headless=new");
        firefox_args.push("-headless");
    }

    let mut caps = Map::new();
    caps.insert("acceptInsecureCerts".to_string(), json!(true));
    caps.insert("goog:chromeOptions".to_string(), json!({ "args": chrome_args }));
    caps.insert("moz:firefoxOptions".to_string(), json!({ "args": firefox_args }));
    caps
}

fn render_error(url: &str, error: impl std::fmt::Display) -> HarvestError {
    HarvestError::Render {
        url: url.to_string(),
        message: error.to_string(),
    }
}

/// Fetches page source with a plain HTTP GET
///
/// Pages whose Content-Type is present and not HTML are refused.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: Client,
}

impl HttpRenderer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl PageRenderer for HttpRenderer {
    async fn render(&self, url: &str) -> Result<String, HarvestError> {
        let (body, content_type) = fetch_text(&self.client, url).await?;

        if let Some(content_type) = content_type {
            let lowered = content_type.to_ascii_lowercase();
            if !lowered.contains("html") {
                return Err(render_error(
                    url,
                    format!("not an HTML document ({})", content_type),
                ));
            }
        }

        Ok(body)
    }
}

/// The renderer selected by configuration
pub enum Renderer {
    WebDriver(WebDriverRenderer),
    Http(HttpRenderer),
}

impl Renderer {
    /// Opens the configured renderer
    ///
    /// `client` is reused by the plain-HTTP renderer.
    pub async fn open(config: &Config, client: Client) -> Result<Self, HarvestError> {
        match config.renderer.kind {
            RendererKind::Webdriver => Ok(Self::WebDriver(
                WebDriverRenderer::connect(&config.renderer).await?,
            )),
            RendererKind::Http => Ok(Self::Http(HttpRenderer::new(client))),
        }
    }

    /// Releases the renderer's session
    pub async fn close(self) {
        match self {
            Self::WebDriver(renderer) => renderer.close().await,
            Self::Http(_) => {}
        }
    }
}

impl PageRenderer for Renderer {
    async fn render(&self, url: &str) -> Result<String, HarvestError> {
        match self {
            Self::WebDriver(renderer) => renderer.render(url).await,
            Self::Http(renderer) => renderer.render(url).await,
        }
    }
}
