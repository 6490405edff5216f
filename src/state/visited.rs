use crate::state::VisitMark;
use crate::url::Locator;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// The crawl's sole deduplication mechanism
///
/// Every operation that checks for a locator and marks it happens under a
/// single lock acquisition, so two concurrent discovery paths can never both
/// claim the same locator.
#[derive(Debug, Default)]
pub struct VisitedSet {
    marks: Mutex<HashMap<Locator, VisitMark>>,
}

impl VisitedSet {
    /// Creates an empty visited set
    pub fn new() -> Self {
        Self::default()
    }

    fn marks(&self) -> MutexGuard<'_, HashMap<Locator, VisitMark>> {
        self.marks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically inserts the locator with the given mark if it is absent
    ///
    /// # Returns
    ///
    /// * `true` - The caller claimed the locator and owns its processing
    /// * `false` - The locator was already present; nothing changed
    pub fn claim(&self, locator: &Locator, mark: VisitMark) -> bool {
        match self.marks().entry(locator.clone()) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(mark);
                true
            }
        }
    }

    /// Atomically moves a page from queued to rendered
    ///
    /// A locator that is absent is claimed as rendered directly. Any other
    /// mark (already rendered, or claimed as a resource) refuses the render.
    pub fn begin_render(&self, locator: &Locator) -> bool {
        match self.marks().entry(locator.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(VisitMark::PageRendered);
                true
            }
            Entry::Occupied(mut slot) => {
                if *slot.get() == VisitMark::PageQueued {
                    slot.insert(VisitMark::PageRendered);
                    true
                } else {
                    false
                }
            }
        }
    }

    /// Records the classification verdict for a resource
    pub fn record_verdict(&self, locator: &Locator, is_image: bool) {
        self.marks()
            .insert(locator.clone(), VisitMark::Resource { is_image });
    }

    /// Returns the memoized classification for a locator, if any
    pub fn verdict(&self, locator: &Locator) -> Option<bool> {
        self.marks().get(locator).and_then(VisitMark::verdict)
    }

    /// Returns the current mark for a locator
    pub fn mark(&self, locator: &Locator) -> Option<VisitMark> {
        self.marks().get(locator).copied()
    }

    /// Total number of locators ever visited, across all link spaces
    pub fn len(&self) -> usize {
        self.marks().len()
    }

    /// Returns whether nothing has been visited yet
    pub fn is_empty(&self) -> bool {
        self.marks().is_empty()
    }

    /// Counts locators whose mark satisfies the predicate
    pub fn count_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&VisitMark) -> bool,
    {
        self.marks().values().filter(|mark| predicate(mark)).count()
    }
}
