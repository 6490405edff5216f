//! Output module for crawl results
//!
//! This module handles:
//! - The catalog of image records accumulated during a crawl
//! - The serializable crawl report handed back to the caller
//! - Human-readable crawl statistics

mod catalog;
mod report;
pub mod stats;

pub use catalog::{Catalog, ImageRecord, NameStamp, MAX_NAME_LENGTH};
pub use report::CrawlReport;
pub use stats::{print_summary, CrawlStatistics};
