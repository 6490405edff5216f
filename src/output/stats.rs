//! Statistics generation from a crawl report
//!
//! This module provides functionality for summarizing and displaying
//! the outcome of a crawl.

use crate::output::CrawlReport;
use std::collections::HashMap;

/// Crawl statistics summary
#[derive(Debug, Clone)]
pub struct CrawlStatistics {
    /// Number of catalogued images
    pub total_images: u64,

    /// Sum of catalogued image sizes in bytes
    pub total_bytes: u64,

    /// Count of images by format
    pub images_by_format: HashMap<String, u64>,

    /// Images whose dimensions are unknown (vector formats)
    pub unsized_images: u64,
}

impl CrawlStatistics {
    /// Computes statistics from a crawl report
    ///
    /// # Arguments
    ///
    /// * `report` - The finished crawl report
    pub fn from_report(report: &CrawlReport) -> Self {
        let mut images_by_format = HashMap::new();
        let mut total_bytes = 0;
        let mut unsized_images = 0;

        for record in report.images.records() {
            *images_by_format.entry(record.format.clone()).or_insert(0) += 1;
            total_bytes += record.size;
            if record.width.is_none() || record.height.is_none() {
                unsized_images += 1;
            }
        }

        Self {
            total_images: report.images.len() as u64,
            total_bytes,
            images_by_format,
            unsized_images,
        }
    }
}

/// Prints a crawl summary to stdout in a formatted manner
///
/// # Arguments
///
/// * `report` - The report to display
pub fn print_summary(report: &CrawlReport) {
    let stats = CrawlStatistics::from_report(report);

    println!("=== Crawl Summary ===\n");

    println!("Overview:");
    println!("  Page links seen: {}", report.total_links_visited);
    println!("  Pages explored: {}", report.links_explored);
    println!("  Pages failed: {}", report.pages_failed);
    println!("  Resources seen: {}", report.resources_seen);
    println!(
        "  Duration: {:.1}s",
        report.duration().num_milliseconds() as f64 / 1000.0
    );
    if report.interrupted {
        println!("  Stopped early: deadline or shutdown");
    }
    println!();

    println!("Images:");
    println!("  Catalogued: {}", stats.total_images);
    println!("  Total size: {}", format_bytes(stats.total_bytes));
    if stats.unsized_images > 0 {
        println!("  Without dimensions: {}", stats.unsized_images);
    }
    println!();

    if !stats.images_by_format.is_empty() {
        println!("Images by Format:");
        // Sort formats by count (descending), then name
        let mut format_counts: Vec<_> = stats.images_by_format.iter().collect();
        format_counts.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

        for (format, count) in format_counts {
            let percentage = (*count as f64 / stats.total_images as f64) * 100.0;
            println!("  {}: {} ({:.1}%)", format, count, percentage);
        }
        println!();
    }
}

fn format_bytes(bytes: u64) -> String {
    const KIB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KIB {
        format!("{} B", bytes)
    } else if value < KIB * KIB {
        format!("{:.1} KiB", value / KIB)
    } else {
        format!("{:.1} MiB", value / (KIB * KIB))
    }
}
