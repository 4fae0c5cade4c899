//! Fetch coordination layer.
//!
//! The screens of the original app each re-implemented the same three
//! behaviors ad hoc; they are unified here as reusable components,
//! parameterized by endpoint through the source traits below:
//!
//! - [`debounce::SuggestionDebouncer`] turns rapid text input into a
//!   rate-limited sequence of suggestion fetches, discarding stale
//!   results.
//! - [`pagination::PagedFetcher`] drives incremental loading of a result
//!   list, tracking the page cursor and end-of-list detection.
//! - [`filters::FilterCoordinator`] owns the active filter set and
//!   refetches through the paged fetcher only when it actually changes.
//!
//! All shared state is mutated only after a generation check, so a
//! response that arrives for a superseded query or filter context is
//! silently dropped rather than applied out of order.

pub mod debounce;
pub mod filters;
pub mod pagination;

use async_trait::async_trait;

use crate::api::Suggestion;
use crate::error::Result;

/// Backend for search-as-you-type suggestions.
#[async_trait]
pub trait SuggestionSource: Send + Sync {
    async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>>;
}

/// Backend for one paginated result list.
///
/// `C` is the query context (filter set, search text, agency slug) and
/// `T` the item type one hit decodes to.
#[async_trait]
pub trait PageSource<C, T>: Send + Sync {
    async fn fetch_page(&self, ctx: &C, page: u32, page_size: u32) -> Result<Vec<T>>;
}
