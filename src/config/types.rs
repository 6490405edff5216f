use serde::Deserialize;
use std::collections::BTreeSet;

/// Default link depth when none is configured
pub const DEFAULT_MAX_DEPTH: u32 = 2;

/// Default maximum image size (5 MiB)
pub const DEFAULT_MAX_IMAGE_SIZE: u64 = 5 * 1024 * 1024;

/// Main configuration structure for Image-Harvest
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub scope: ScopeConfig,
    #[serde(default)]
    pub renderer: RendererConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub crawl: CrawlLimits,
}

impl Config {
    /// Creates a configuration for the given scope with default settings
    pub fn with_scope(scope: ScopeConfig) -> Self {
        Self {
            scope,
            ..Self::default()
        }
    }
}

/// The crawl scope: where to start, how deep to go, and what to keep
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeConfig {
    /// Base URL; also the prefix bounding which pages are traversed
    #[serde(rename = "base-url", default)]
    pub base_url: String,

    /// Maximum link depth from the base URL
    #[serde(rename = "max-depth", default = "default_max_depth")]
    pub max_depth: u32,

    /// Largest image, in bytes, admitted into the catalog
    #[serde(rename = "max-image-size", default = "default_max_image_size")]
    pub max_image_size: u64,

    /// File extensions admitted into the catalog (empty admits all)
    #[serde(rename = "allowed-extensions", default)]
    pub allowed_extensions: Vec<String>,
}

impl ScopeConfig {
    /// Creates a scope for a base URL with default limits
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// The allowed extensions, lowercased and without leading dots
    pub fn normalized_extensions(&self) -> BTreeSet<String> {
        self.allowed_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect()
    }

    /// Returns true if an image with this extension may be catalogued
    pub fn extension_allowed(&self, extension: &str) -> bool {
        let allowed = self.normalized_extensions();
        allowed.is_empty() || allowed.contains(&extension.trim_start_matches('.').to_ascii_lowercase())
    }

    /// Returns true if an image of this size may be catalogued
    pub fn size_allowed(&self, byte_size: u64) -> bool {
        byte_size <= self.max_image_size
    }
}

impl Default for ScopeConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            max_depth: DEFAULT_MAX_DEPTH,
            max_image_size: DEFAULT_MAX_IMAGE_SIZE,
            allowed_extensions: Vec::new(),
        }
    }
}

/// Which page renderer drives page loads
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RendererKind {
    /// A headless browser session over WebDriver
    #[default]
    Webdriver,
    /// A plain HTTP GET of the page source (no script execution)
    Http,
}

/// Page renderer configuration
#[derive(Debug, Clone, Deserialize)]
pub struct RendererConfig {
    #[serde(default)]
    pub kind: RendererKind,

    /// WebDriver server endpoint
    #[serde(rename = "webdriver-url", default = "default_webdriver_url")]
    pub webdriver_url: String,

    /// Ask the browser to run headless
    #[serde(default = "default_true")]
    pub headless: bool,

    /// Upper bound on a single page load (seconds)
    #[serde(rename = "page-timeout-secs", default = "default_page_timeout")]
    pub page_timeout_secs: u64,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            kind: RendererKind::default(),
            webdriver_url: default_webdriver_url(),
            headless: true,
            page_timeout_secs: default_page_timeout(),
        }
    }
}

/// HTTP client configuration for metadata, image and stylesheet fetches
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    #[serde(rename = "user-agent", default = "default_user_agent")]
    pub user_agent: String,

    #[serde(rename = "request-timeout-secs", default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    #[serde(rename = "connect-timeout-secs", default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(rename = "max-redirects", default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            max_redirects: default_max_redirects(),
        }
    }
}

/// Whole-crawl limits
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrawlLimits {
    /// Deadline for the entire crawl (seconds); the partial catalog is
    /// returned when it passes
    #[serde(rename = "timeout-secs", default)]
    pub timeout_secs: Option<u64>,
}

fn default_max_depth() -> u32 {
    DEFAULT_MAX_DEPTH
}

fn default_max_image_size() -> u64 {
    DEFAULT_MAX_IMAGE_SIZE
}

fn default_webdriver_url() -> String {
    "http://localhost:4444".to_string()
}

fn default_true() -> bool {
    true
}

fn default_page_timeout() -> u64 {
    60
}

fn default_user_agent() -> String {
    format!("image-harvest/{}", env!("CARGO_PKG_VERSION"))
}

fn default_request_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_max_redirects() -> usize {
    5
}
