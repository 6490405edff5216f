//! The crawl frontier: a FIFO queue of pages awaiting render
//!
//! Entries leave in the order they arrived, so every page at depth `d` is
//! dequeued before any page at depth `d + 1` that was discovered from it.

use crate::url::{Link, Locator};
use std::collections::VecDeque;
use url::Url;

/// A page queued for rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    /// The page locator, its visited-set key
    pub locator: Locator,

    /// The URL to render and to resolve the page's references against
    pub url: Url,

    /// Link distance from the base URL
    pub depth: u32,
}

/// FIFO queue of frontier entries
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a frontier holding only the seed page at depth 0
    pub fn seeded(seed: Link) -> Self {
        let mut frontier = Self::new();
        frontier.enqueue(seed, 0);
        frontier
    }

    /// Appends an entry to the tail
    pub fn enqueue(&mut self, link: Link, depth: u32) {
        let Link { locator, url } = link;
        self.queue.push_back(FrontierEntry { locator, url, depth });
    }

    /// Removes and returns the head, or None when empty
    pub fn dequeue(&mut self) -> Option<FrontierEntry> {
        self.queue.pop_front()
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
