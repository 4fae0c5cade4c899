//! Debounced search-as-you-type suggestion fetching.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

use super::SuggestionSource;
use crate::api::Suggestion;

/// Default quiet interval before a request is issued.
pub const DEFAULT_DEBOUNCE_MS: u64 = 600;

/// Observable suggestion state rendered by the caller.
#[derive(Debug, Clone, Default)]
pub struct SuggestionsSnapshot {
    pub suggestions: Vec<Suggestion>,
    pub loading: bool,
    pub error: bool,
}

/// Converts a rapidly changing text query into a rate-limited sequence
/// of suggestion requests.
///
/// `on_text_changed` is called on every keystroke; no request is issued
/// until the text has been quiet for the debounce interval, and only the
/// most recent text value is ever sent. A response that arrives after a
/// newer keystroke has superseded it is discarded, so the snapshot only
/// ever reflects the latest query.
///
/// Must be used from within a tokio runtime: the pending timer runs as a
/// spawned task, which is aborted on supersession and on drop.
pub struct SuggestionDebouncer {
    source: Arc<dyn SuggestionSource>,
    debounce: Duration,
    state: Arc<Mutex<SuggestionsSnapshot>>,
    generation: Arc<AtomicU64>,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl SuggestionDebouncer {
    pub fn new(source: Arc<dyn SuggestionSource>) -> Self {
        Self::with_debounce(source, Duration::from_millis(DEFAULT_DEBOUNCE_MS))
    }

    pub fn with_debounce(source: Arc<dyn SuggestionSource>, debounce: Duration) -> Self {
        Self {
            source,
            debounce,
            state: Arc::new(Mutex::new(SuggestionsSnapshot::default())),
            generation: Arc::new(AtomicU64::new(0)),
            pending: Mutex::new(None),
        }
    }

    /// Feed the current text value. Supersedes any pending or in-flight
    /// fetch. Empty text clears the suggestions immediately without
    /// issuing a request.
    pub fn on_text_changed(&self, text: &str) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }

        let text = text.trim().to_string();
        if text.is_empty() {
            let mut state = self.state.lock();
            state.suggestions.clear();
            state.loading = false;
            state.error = false;
            return;
        }

        // An aborted in-flight fetch must not leave the loading flag set.
        self.state.lock().loading = false;

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        let current = Arc::clone(&self.generation);
        let debounce = self.debounce;

        let handle = tokio::spawn(async move {
            tokio::time::sleep(debounce).await;
            if current.load(Ordering::SeqCst) != generation {
                return;
            }

            state.lock().loading = true;
            let result = source.fetch_suggestions(&text).await;

            let mut state = state.lock();
            if current.load(Ordering::SeqCst) != generation {
                tracing::debug!(query = %text, "discarding stale suggestion response");
                return;
            }
            match result {
                Ok(hits) => {
                    state.suggestions = hits;
                    state.error = false;
                }
                Err(err) => {
                    tracing::warn!(query = %text, error = %err, "suggestion fetch failed");
                    state.suggestions.clear();
                    state.error = true;
                }
            }
            state.loading = false;
        });

        *self.pending.lock() = Some(handle);
    }

    /// Cancel any pending timer or in-flight fetch. Its response, if it
    /// ever materializes, is discarded.
    pub fn cancel(&self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending.lock().take() {
            handle.abort();
        }
        self.state.lock().loading = false;
    }

    pub fn snapshot(&self) -> SuggestionsSnapshot {
        self.state.lock().clone()
    }
}

impl Drop for SuggestionDebouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BayutError, Result};
    use async_trait::async_trait;
    use std::collections::HashMap;

    fn suggestion(name: &str) -> Suggestion {
        Suggestion {
            id: 1,
            name: name.to_string(),
            external_id: "5002".to_string(),
            geography: None,
        }
    }

    #[derive(Default)]
    struct StubSource {
        queries: Mutex<Vec<String>>,
        delays: HashMap<String, Duration>,
        fail: bool,
    }

    #[async_trait]
    impl SuggestionSource for StubSource {
        async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>> {
            self.queries.lock().push(query.to_string());
            if let Some(delay) = self.delays.get(query) {
                tokio::time::sleep(*delay).await;
            }
            if self.fail {
                return Err(BayutError::Api("boom".to_string()));
            }
            Ok(vec![suggestion(query)])
        }
    }

    async fn settle() {
        // Past the debounce interval plus slack for the fetch itself.
        tokio::time::sleep(Duration::from_millis(DEFAULT_DEBOUNCE_MS + 100)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_keystrokes_coalesce_to_one_fetch() {
        let source = Arc::new(StubSource::default());
        let debouncer = SuggestionDebouncer::new(source.clone());

        let text = "Dubai Marina";
        for end in 1..=text.len() {
            debouncer.on_text_changed(&text[..end]);
            tokio::time::advance(Duration::from_millis(40)).await;
        }
        settle().await;

        assert_eq!(*source.queries.lock(), vec!["Dubai Marina".to_string()]);
        let snapshot = debouncer.snapshot();
        assert_eq!(snapshot.suggestions.len(), 1);
        assert_eq!(snapshot.suggestions[0].name, "Dubai Marina");
        assert!(!snapshot.loading);
        assert!(!snapshot.error);
    }

    #[tokio::test(start_paused = true)]
    async fn test_separate_quiet_periods_fetch_separately() {
        let source = Arc::new(StubSource::default());
        let debouncer = SuggestionDebouncer::new(source.clone());

        debouncer.on_text_changed("Dubai");
        settle().await;
        debouncer.on_text_changed("Dubai Marina");
        settle().await;

        assert_eq!(
            *source.queries.lock(),
            vec!["Dubai".to_string(), "Dubai Marina".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_text_clears_without_request() {
        let source = Arc::new(StubSource::default());
        let debouncer = SuggestionDebouncer::new(source.clone());

        debouncer.on_text_changed("Dubai");
        settle().await;
        assert_eq!(debouncer.snapshot().suggestions.len(), 1);

        debouncer.on_text_changed("");
        let snapshot = debouncer.snapshot();
        assert!(snapshot.suggestions.is_empty());
        assert!(!snapshot.loading);

        settle().await;
        assert_eq!(source.queries.lock().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_input_supersedes_inflight_fetch() {
        let mut delays = HashMap::new();
        delays.insert("slow".to_string(), Duration::from_millis(2_000));
        let source = Arc::new(StubSource {
            delays,
            ..Default::default()
        });
        let debouncer = SuggestionDebouncer::new(source.clone());

        debouncer.on_text_changed("slow");
        // Let the debounce elapse so the slow fetch is in flight.
        tokio::time::sleep(Duration::from_millis(DEFAULT_DEBOUNCE_MS + 50)).await;
        assert_eq!(source.queries.lock().len(), 1);

        debouncer.on_text_changed("fast");
        settle().await;
        // Give the slow response's original deadline time to pass too.
        tokio::time::sleep(Duration::from_millis(3_000)).await;

        let snapshot = debouncer.snapshot();
        assert_eq!(snapshot.suggestions.len(), 1);
        assert_eq!(snapshot.suggestions[0].name, "fast");
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_failure_sets_error_flag() {
        let source = Arc::new(StubSource {
            fail: true,
            ..Default::default()
        });
        let debouncer = SuggestionDebouncer::new(source.clone());

        debouncer.on_text_changed("Dubai");
        settle().await;

        let snapshot = debouncer.snapshot();
        assert!(snapshot.suggestions.is_empty());
        assert!(snapshot.error);
        assert!(!snapshot.loading);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_suppresses_pending_fetch() {
        let source = Arc::new(StubSource::default());
        let debouncer = SuggestionDebouncer::new(source.clone());

        debouncer.on_text_changed("Dubai");
        debouncer.cancel();
        settle().await;

        assert!(source.queries.lock().is_empty());
    }
}
