//! State module for tracking crawl progress
//!
//! This module provides the crawl-scoped state shared by the orchestrator and
//! its concurrent fan-out branches.
//!
//! # Components
//!
//! - `VisitMark`: What is known about a locator once it enters the visited set
//! - `VisitedSet`: The deduplication map with atomic check-and-mark operations
//! - `CrawlContext`: Visited set, catalog and counters for one crawl invocation

mod context;
mod visit_mark;
mod visited;

// Re-export main types
pub use context::{CrawlContext, CrawlCounters};
pub use visit_mark::VisitMark;
pub use visited::VisitedSet;
