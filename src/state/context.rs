use crate::output::{Catalog, ImageRecord, NameStamp};
use crate::state::VisitedSet;
use chrono::Utc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

/// Traversal counters for one crawl
#[derive(Debug, Default)]
pub struct CrawlCounters {
    pages_seen: AtomicU64,
    pages_rendered: AtomicU64,
    pages_failed: AtomicU64,
    images_rejected: AtomicU64,
}

impl CrawlCounters {
    pub fn page_seen(&self) {
        self.pages_seen.fetch_add(1, Ordering::Relaxed);
    }

    pub fn page_rendered(&self) {
        self.pages_rendered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn page_failed(&self) {
        self.pages_failed.fetch_add(1, Ordering::Relaxed);
    }

    /// An image that was inspected but filtered out of the catalog
    pub fn image_rejected(&self) {
        self.images_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Page locators ever seen (seed plus every enqueued page)
    pub fn pages_seen(&self) -> u64 {
        self.pages_seen.load(Ordering::Relaxed)
    }

    pub fn pages_rendered(&self) -> u64 {
        self.pages_rendered.load(Ordering::Relaxed)
    }

    pub fn pages_failed(&self) -> u64 {
        self.pages_failed.load(Ordering::Relaxed)
    }

    pub fn images_rejected(&self) -> u64 {
        self.images_rejected.load(Ordering::Relaxed)
    }
}

/// All mutable state of a single crawl invocation
///
/// Created when a crawl starts and consumed when it returns. Concurrent
/// fan-out branches share it by reference; the visited set and catalog each
/// serialize their own writers.
#[derive(Debug, Default)]
pub struct CrawlContext {
    visited: VisitedSet,
    catalog: Mutex<Catalog>,
    counters: CrawlCounters,
    name_seq: AtomicU64,
}

impl CrawlContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }

    pub fn counters(&self) -> &CrawlCounters {
        &self.counters
    }

    /// Returns fresh uniqueness material for a display name
    pub fn next_stamp(&self) -> NameStamp {
        NameStamp {
            millis: Utc::now().timestamp_millis(),
            seq: self.name_seq.fetch_add(1, Ordering::Relaxed),
        }
    }

    /// Inserts a record into the catalog; false if the locator is already present
    pub fn insert_record(&self, record: ImageRecord) -> bool {
        self.catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(record)
    }

    pub fn catalog_len(&self) -> usize {
        self.catalog
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Consumes the context, returning the accumulated catalog
    pub fn into_catalog(self) -> Catalog {
        self.catalog
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
