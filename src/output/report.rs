use crate::output::Catalog;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// The result of one crawl invocation
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// True when the crawl ran to completion (not cut short)
    pub success: bool,

    /// Page locators ever seen: the seed plus every enqueued page
    pub total_links_visited: u64,

    /// Pages actually rendered
    pub links_explored: u64,

    /// Pages whose render failed or timed out
    pub pages_failed: u64,

    /// Distinct locators in the visited set across all link spaces
    pub resources_seen: u64,

    /// Set when a deadline or shutdown signal stopped the crawl early
    pub interrupted: bool,

    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Catalogued images keyed by locator
    pub images: Catalog,
}

impl CrawlReport {
    /// Wall-clock duration of the crawl
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
