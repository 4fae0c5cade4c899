pub mod api;
pub mod config;
pub mod error;
pub mod fetch;

pub use api::client::BayutClient;
pub use api::{
    Agency, AgencySearch, AgencySlug, Category, FilterSet, FurnishingStatus, PropertyDetail,
    PropertySummary, Purpose, RentFrequency, Suggestion,
};
pub use config::Config;
pub use error::{BayutError, Result};
pub use fetch::debounce::{SuggestionDebouncer, SuggestionsSnapshot};
pub use fetch::filters::FilterCoordinator;
pub use fetch::pagination::{DEFAULT_PAGE_SIZE, FetchPhase, ListSnapshot, PagedFetcher};
pub use fetch::{PageSource, SuggestionSource};
