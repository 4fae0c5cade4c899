//! Incremental ("infinite scroll") page loading with end-of-list
//! detection and stale-response suppression.

use std::sync::Arc;

use parking_lot::Mutex;

use super::PageSource;

/// Page size the list endpoints are asked for.
pub const DEFAULT_PAGE_SIZE: u32 = 30;

/// Lifecycle of the current page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchPhase {
    /// No fetch in flight; more pages may exist.
    Idle,
    /// A fetch for the current page index is in flight.
    Loading,
    /// The last page came back short; no further pages exist.
    Exhausted,
    /// The last attempt failed. The page index was not advanced and the
    /// caller may retry.
    Failed,
}

/// Observable list state rendered by the caller.
#[derive(Debug, Clone)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    /// Next page index to be requested.
    pub page: u32,
    pub loading: bool,
    pub has_more: bool,
    pub failed: bool,
}

struct PageState<C, T> {
    ctx: C,
    items: Vec<T>,
    page: u32,
    has_more: bool,
    phase: FetchPhase,
    generation: u64,
}

/// Drives incremental loading of one result list.
///
/// Pages are requested and applied strictly in increasing index order:
/// the `Loading` guard admits at most one in-flight request, and a
/// response belonging to a context superseded by [`reset`] is dropped at
/// apply time via the generation check rather than reordered.
///
/// [`reset`]: PagedFetcher::reset
pub struct PagedFetcher<C, T> {
    source: Arc<dyn PageSource<C, T>>,
    page_size: u32,
    inner: Mutex<PageState<C, T>>,
}

impl<C, T> PagedFetcher<C, T>
where
    C: Clone + Send + Sync,
    T: Send,
{
    pub fn new(source: Arc<dyn PageSource<C, T>>, ctx: C, page_size: u32) -> Self {
        Self {
            source,
            page_size,
            inner: Mutex::new(PageState {
                ctx,
                items: Vec::new(),
                page: 0,
                has_more: true,
                phase: FetchPhase::Idle,
                generation: 0,
            }),
        }
    }

    /// Discard the accumulated list and start over under a new context.
    /// Any in-flight fetch from the prior context is invalidated; its
    /// eventual response is dropped.
    pub fn reset(&self, ctx: C) {
        let mut state = self.inner.lock();
        state.generation += 1;
        state.ctx = ctx;
        state.items.clear();
        state.page = 0;
        state.has_more = true;
        state.phase = FetchPhase::Idle;
    }

    /// Fetch the next page and append it to the accumulated list.
    ///
    /// A no-op while a fetch is already in flight or once the list is
    /// exhausted. After a failure the page index is unchanged, so calling
    /// again retries the same page. Returns whether a page was applied.
    pub async fn load_next_page(&self) -> bool {
        let (generation, page, ctx) = {
            let mut state = self.inner.lock();
            if state.phase == FetchPhase::Loading || !state.has_more {
                return false;
            }
            state.phase = FetchPhase::Loading;
            (state.generation, state.page, state.ctx.clone())
        };

        let result = self.source.fetch_page(&ctx, page, self.page_size).await;

        let mut state = self.inner.lock();
        if state.generation != generation {
            tracing::debug!(page, "discarding page response from superseded context");
            return false;
        }
        match result {
            Ok(items) => {
                state.has_more = items.len() as u32 == self.page_size;
                state.items.extend(items);
                state.page += 1;
                state.phase = if state.has_more {
                    FetchPhase::Idle
                } else {
                    FetchPhase::Exhausted
                };
                true
            }
            Err(err) => {
                tracing::warn!(page, error = %err, "page fetch failed");
                state.phase = FetchPhase::Failed;
                false
            }
        }
    }

    pub fn phase(&self) -> FetchPhase {
        self.inner.lock().phase
    }

    pub fn has_more(&self) -> bool {
        self.inner.lock().has_more
    }

    pub fn context(&self) -> C {
        self.inner.lock().ctx.clone()
    }

    pub fn snapshot(&self) -> ListSnapshot<T>
    where
        T: Clone,
    {
        let state = self.inner.lock();
        ListSnapshot {
            items: state.items.clone(),
            page: state.page,
            loading: state.phase == FetchPhase::Loading,
            has_more: state.has_more,
            failed: state.phase == FetchPhase::Failed,
        }
    }
}
