//! JSON crawl requests as submitted by the service layer
//!
//! Field names are camelCase. Numeric fields are accepted as JSON numbers or
//! numeric strings; anything else falls back to the default.

use crate::config::types::{ScopeConfig, DEFAULT_MAX_DEPTH, DEFAULT_MAX_IMAGE_SIZE};
use crate::ConfigError;
use serde::Deserialize;
use serde_json::Value;

/// A crawl request body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlRequest {
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default)]
    pub max_depth: Option<Value>,

    #[serde(default)]
    pub max_image_size: Option<Value>,

    #[serde(default)]
    pub allowed_extensions: Option<Vec<String>>,
}

impl CrawlRequest {
    /// Parses a request body
    pub fn from_json(body: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(body)?)
    }

    /// The requested depth, or the default when absent or not numeric
    pub fn max_depth(&self) -> u32 {
        self.max_depth
            .as_ref()
            .and_then(lenient_u64)
            .and_then(|depth| u32::try_from(depth).ok())
            .unwrap_or(DEFAULT_MAX_DEPTH)
    }

    /// The requested size limit, or the default when absent or not numeric
    pub fn max_image_size(&self) -> u64 {
        self.max_image_size
            .as_ref()
            .and_then(lenient_u64)
            .unwrap_or(DEFAULT_MAX_IMAGE_SIZE)
    }

    /// Builds a scope from the request
    ///
    /// A missing or blank `baseUrl` is the one hard failure.
    pub fn into_scope(self) -> Result<ScopeConfig, ConfigError> {
        let max_depth = self.max_depth();
        let max_image_size = self.max_image_size();

        let base_url = self
            .base_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingBaseUrl)?;

        Ok(ScopeConfig {
            base_url,
            max_depth,
            max_image_size,
            allowed_extensions: self.allowed_extensions.unwrap_or_default(),
        })
    }
}

fn lenient_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f.trunc() as u64)),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }
}
