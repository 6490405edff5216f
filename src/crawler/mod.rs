//! Crawler module for page rendering and image discovery
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching for classification, image bytes and stylesheets
//! - Page rendering through a headless browser or plain HTTP
//! - HTML link extraction and stylesheet scanning
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod css;
mod fetcher;
mod frontier;
mod parser;
mod renderer;

pub use coordinator::Coordinator;
pub use css::scan_stylesheet;
pub use fetcher::{build_http_client, check_content_type, fetch_bytes, fetch_text, FetchedBody};
pub use frontier::{Frontier, FrontierEntry};
pub use parser::{extract_links, ExtractedLinks};
pub use renderer::{HttpRenderer, PageRenderer, Renderer, WebDriverRenderer};

use crate::config::Config;
use crate::output::CrawlReport;
use crate::HarvestError;
use std::future::Future;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP client and open the configured renderer
/// 3. Crawl breadth-first from the base URL
/// 4. Release the renderer session
/// 5. Return the report with the image catalog
///
/// # Arguments
///
/// * `config` - The crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished; per-page and per-image failures are
///   absorbed into the report
/// * `Err(HarvestError)` - Invalid configuration or renderer session failure
pub async fn crawl(config: Config) -> Result<CrawlReport, HarvestError> {
    crawl_until(config, std::future::pending()).await
}

/// Runs a crawl that stops early, with a partial report, once `shutdown`
/// resolves
pub async fn crawl_until<F>(config: Config, shutdown: F) -> Result<CrawlReport, HarvestError>
where
    F: Future<Output = ()>,
{
    let coordinator = Coordinator::new(config)?;
    let renderer = Renderer::open(coordinator.config(), coordinator.client().clone()).await?;

    let report = coordinator.run_until(&renderer, shutdown).await;
    renderer.close().await;

    Ok(report)
}
