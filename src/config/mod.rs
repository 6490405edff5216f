//! Configuration module for Image-Harvest
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files, and parsing JSON crawl requests from the service layer.
//!
//! # Example
//!
//! ```no_run
//! use image_harvest::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.scope.max_depth);
//! ```

mod parser;
mod request;
mod types;
mod validation;

// Re-export types
pub use request::CrawlRequest;
pub use types::{
    Config, CrawlLimits, HttpConfig, RendererConfig, RendererKind, ScopeConfig,
    DEFAULT_MAX_DEPTH, DEFAULT_MAX_IMAGE_SIZE,
};

// Re-export parser functions
pub use parser::{
    compute_config_hash, load_config, parse_config, read_config,
};
pub use validation::validate;
