//! Visit mark definitions for the shared visited set
//!
//! Pages, stylesheets and images share one locator namespace, so the mark
//! records which kind of work claimed a locator first.

use std::fmt;

/// Represents what is known about a locator in the visited set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VisitMark {
    // ===== Page Marks =====
    /// Page was discovered in scope and placed on the frontier
    PageQueued,

    /// Page was dequeued and handed to the renderer
    PageRendered,

    // ===== Resource Marks =====
    /// Stylesheet was claimed for fetching and scanning
    Stylesheet,

    /// Resource was claimed and its classification is in flight
    Pending,

    /// Resource was classified
    Resource {
        /// Whether the resource is an image
        is_image: bool,
    },
}

impl VisitMark {
    /// Returns true for page marks
    pub fn is_page(&self) -> bool {
        matches!(self, Self::PageQueued | Self::PageRendered)
    }

    /// Returns the memoized classification, if one was recorded
    pub fn verdict(&self) -> Option<bool> {
        match self {
            Self::Resource { is_image } => Some(*is_image),
            _ => None,
        }
    }

    /// Short label used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageQueued => "page_queued",
            Self::PageRendered => "page_rendered",
            Self::Stylesheet => "stylesheet",
            Self::Pending => "pending",
            Self::Resource { is_image: true } => "image",
            Self::Resource { is_image: false } => "non_image",
        }
    }
}

impl fmt::Display for VisitMark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
