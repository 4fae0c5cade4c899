//! Filter-state coordination for the property list.

use std::sync::Arc;

use parking_lot::Mutex;

use super::PageSource;
use super::pagination::{DEFAULT_PAGE_SIZE, ListSnapshot, PagedFetcher};
use crate::api::{Category, FilterSet, FurnishingStatus, PropertySummary, Purpose, RentFrequency};

/// Owns the active [`FilterSet`] and refetches the property list when it
/// changes.
///
/// Replacing the set with a structurally equal one is a no-op, so a
/// filter sheet re-applied without edits never triggers a redundant
/// refetch. On a real change the paged fetcher is reset and page 0 is
/// fetched under the new filters; the result is observed through the
/// fetcher's snapshot, and further pages are pulled with
/// [`load_next_page`].
///
/// [`load_next_page`]: FilterCoordinator::load_next_page
pub struct FilterCoordinator {
    fetcher: PagedFetcher<FilterSet, PropertySummary>,
    current: Mutex<FilterSet>,
}

impl FilterCoordinator {
    pub fn new(
        source: Arc<dyn PageSource<FilterSet, PropertySummary>>,
        initial: FilterSet,
    ) -> Self {
        Self {
            fetcher: PagedFetcher::new(source, initial.clone(), DEFAULT_PAGE_SIZE),
            current: Mutex::new(initial),
        }
    }

    /// Replace the whole filter set. No-op when structurally unchanged.
    pub async fn apply_filters(&self, new: FilterSet) {
        {
            let mut current = self.current.lock();
            if *current == new {
                tracing::debug!("filters unchanged, skipping refetch");
                return;
            }
            *current = new.clone();
        }
        self.fetcher.reset(new);
        self.fetcher.load_next_page().await;
    }

    /// Merge a new transaction type into the current set and apply.
    pub async fn set_purpose(&self, purpose: Option<Purpose>) {
        let mut next = self.filters();
        next.purpose = purpose;
        self.apply_filters(next).await;
    }

    /// Merge a new category into the current set and apply.
    pub async fn set_category(&self, category: Option<Category>) {
        let mut next = self.filters();
        next.category = category;
        self.apply_filters(next).await;
    }

    /// Merge a new furnishing constraint into the current set and apply.
    pub async fn set_furnishing(&self, furnishing: Option<FurnishingStatus>) {
        let mut next = self.filters();
        next.furnishing_status = furnishing;
        self.apply_filters(next).await;
    }

    /// Merge a new rent frequency into the current set and apply.
    pub async fn set_rent_frequency(&self, frequency: Option<RentFrequency>) {
        let mut next = self.filters();
        next.rent_frequency = frequency;
        self.apply_filters(next).await;
    }

    /// The currently active filter set.
    pub fn filters(&self) -> FilterSet {
        self.current.lock().clone()
    }

    /// Pull the next page under the current filters (infinite scroll).
    pub async fn load_next_page(&self) -> bool {
        self.fetcher.load_next_page().await
    }

    pub fn snapshot(&self) -> ListSnapshot<PropertySummary> {
        self.fetcher.snapshot()
    }
}
