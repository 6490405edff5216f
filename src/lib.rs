//! Image-Harvest: a breadth-first image cataloguer
//!
//! This crate crawls a website from a base URL, discovers every image reachable
//! within a bounded link depth (including images referenced from stylesheets and
//! inline data locators), and returns a catalog of image metadata.

pub mod config;
pub mod crawler;
pub mod events;
pub mod image;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Image-Harvest operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Body of {url} is {size} bytes, over the {limit} byte limit")]
    TooLarge { url: String, size: u64, limit: u64 },

    #[error("Render error for {url}: {message}")]
    Render { url: String, message: String },

    #[error("Render timeout for {url}")]
    RenderTimeout { url: String },

    #[error("Failed to start renderer session: {0}")]
    Session(String),

    #[error("Decode error for {locator}: {message}")]
    Decode { locator: String, message: String },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to parse crawl request: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Missing base URL")]
    MissingBaseUrl,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Malformed data locator: {0}")]
    MalformedData(String),
}

/// Result type alias for Image-Harvest operations
pub type Result<T> = std::result::Result<T, HarvestError>;

// Re-export commonly used types
pub use config::{Config, ScopeConfig};
pub use crawler::{crawl, crawl_until, Coordinator};
pub use output::{Catalog, CrawlReport, ImageRecord};
pub use crate::url::{canonicalize, Locator};
