//! HTTP client for the Bayut RapidAPI endpoints.
//!
//! # Security Note - Logging
//!
//! The RapidAPI key is protected from being logged through reqwest's
//! request logging by the `RedactedHeader` wrapper, which implements
//! `Display` and `Debug` to redact sensitive values. Avoid enabling
//! `RUST_LOG=reqwest=debug` in production regardless.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use reqwest::header;
use secrecy::{ExposeSecret, SecretBox};
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{BayutError, Result};
use crate::fetch::{PageSource, SuggestionSource};

use super::{
    Agency, AgencySearch, AgencySlug, FilterSet, PropertyDetail, PropertySummary, Suggestion,
};

const PROPERTIES_HOST: &str = "bayut.p.rapidapi.com";
const AGENCIES_HOST: &str = "bayut-com1.p.rapidapi.com";

/// Hit count the auto-complete endpoint is asked for.
const SUGGESTION_HITS_PER_PAGE: u32 = 25;

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    fn as_header_value(&self) -> Result<header::HeaderValue> {
        header::HeaderValue::from_str(&self.value)
            .map_err(|_| BayutError::Auth("API key contains invalid header characters".to_string()))
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Client for the aggregator's property and agency endpoints.
///
/// The two endpoint families live on different RapidAPI hosts and may be
/// provisioned with separate keys; when only one key is configured it is
/// used for both.
pub struct BayutClient {
    client: Client,
    api_key: SecretBox<String>,
    agencies_api_key: SecretBox<String>,
    properties_base: String,
    agencies_base: String,
}

impl BayutClient {
    /// Create a client with a single API key used for both hosts.
    ///
    /// Configures the HTTP client with 30s connect timeout and 60s total timeout.
    pub fn new(api_key: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .connect_timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            client,
            api_key: SecretBox::new(Box::new(api_key.to_string())),
            agencies_api_key: SecretBox::new(Box::new(api_key.to_string())),
            properties_base: format!("https://{}", PROPERTIES_HOST),
            agencies_base: format!("https://{}", AGENCIES_HOST),
        })
    }

    /// Create a client from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config.bayut_api_key().ok_or_else(|| {
            BayutError::Auth(
                "Bayut API key not configured. Set BAYUT_API_KEY or run: bayut config set api_key <key>"
                    .to_string(),
            )
        })?;

        let mut client = Self::new(&api_key)?;
        if let Some(key) = config.agencies_api_key() {
            client.agencies_api_key = SecretBox::new(Box::new(key));
        }
        Ok(client)
    }

    /// Use a dedicated key for the agency endpoints.
    pub fn with_agencies_key(mut self, api_key: &str) -> Self {
        self.agencies_api_key = SecretBox::new(Box::new(api_key.to_string()));
        self
    }

    /// Point the client at alternate base URLs. Used by tests to target a
    /// local mock server; the `x-rapidapi-host` headers are unaffected.
    pub fn with_base_urls(
        mut self,
        properties_base: impl Into<String>,
        agencies_base: impl Into<String>,
    ) -> Self {
        self.properties_base = properties_base.into();
        self.agencies_base = agencies_base.into();
        self
    }

    async fn get_json(
        &self,
        base: &str,
        host: &'static str,
        key: &SecretBox<String>,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<serde_json::Value> {
        let url = format!("{}{}", base, path);
        let auth = RedactedHeader::new(key.expose_secret());

        tracing::debug!(path, "issuing listings API request");
        let response = self
            .client
            .get(&url)
            .query(params)
            .header("x-rapidapi-host", host)
            .header("x-rapidapi-key", auth.as_header_value()?)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(BayutError::Api(format!("HTTP {} from {}", status, path)));
        }

        Ok(response.json().await?)
    }

    /// GET a `{ hits: [...] }` response and decode the hit list.
    async fn get_hits<T: DeserializeOwned>(
        &self,
        base: &str,
        host: &'static str,
        key: &SecretBox<String>,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>> {
        let value = self.get_json(base, host, key, path, params).await?;
        let hits = value
            .get("hits")
            .cloned()
            .ok_or_else(|| BayutError::Parse(format!("missing `hits` in {} response", path)))?;
        Ok(serde_json::from_value(hits)?)
    }

    /// Location auto-complete for search-as-you-type.
    pub async fn auto_complete(&self, query: &str) -> Result<Vec<Suggestion>> {
        let params = [
            ("query", query.to_string()),
            ("hitsPerPage", SUGGESTION_HITS_PER_PAGE.to_string()),
            ("page", "0".to_string()),
            ("lang", "en".to_string()),
        ];
        self.get_hits(
            &self.properties_base,
            PROPERTIES_HOST,
            &self.api_key,
            "/auto-complete",
            &params,
        )
        .await
    }

    /// One page of listings matching the filter set. Unset filter fields
    /// are omitted from the query string.
    pub async fn list_properties(
        &self,
        filters: &FilterSet,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<PropertySummary>> {
        let mut params = filters.to_query();
        params.push(("hitsPerPage", page_size.to_string()));
        params.push(("page", page.to_string()));
        self.get_hits(
            &self.properties_base,
            PROPERTIES_HOST,
            &self.api_key,
            "/properties/list",
            &params,
        )
        .await
    }

    /// Full record for one listing.
    pub async fn property_detail(&self, external_id: &str) -> Result<PropertyDetail> {
        let params = [("externalID", external_id.to_string())];
        let value = self
            .get_json(
                &self.properties_base,
                PROPERTIES_HOST,
                &self.api_key,
                "/properties/detail",
                &params,
            )
            .await?;
        Ok(serde_json::from_value(value)?)
    }

    /// One page of the agency directory for a free-text query.
    pub async fn list_agencies(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Agency>> {
        let params = [
            ("query", query.to_string()),
            ("hitsPerPage", page_size.to_string()),
            ("page", page.to_string()),
            ("lang", "en".to_string()),
        ];
        self.get_hits(
            &self.agencies_base,
            AGENCIES_HOST,
            &self.agencies_api_key,
            "/agencies/list",
            &params,
        )
        .await
    }

    /// One page of a single agency's listings.
    pub async fn agency_listings(
        &self,
        slug: &str,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<PropertySummary>> {
        let params = [
            ("agencySlug", slug.to_string()),
            ("hitsPerPage", page_size.to_string()),
            ("page", page.to_string()),
        ];
        self.get_hits(
            &self.agencies_base,
            AGENCIES_HOST,
            &self.agencies_api_key,
            "/agencies/get-listings",
            &params,
        )
        .await
    }
}

#[async_trait::async_trait]
impl SuggestionSource for BayutClient {
    async fn fetch_suggestions(&self, query: &str) -> Result<Vec<Suggestion>> {
        self.auto_complete(query).await
    }
}

#[async_trait::async_trait]
impl PageSource<FilterSet, PropertySummary> for BayutClient {
    async fn fetch_page(
        &self,
        ctx: &FilterSet,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<PropertySummary>> {
        self.list_properties(ctx, page, page_size).await
    }
}

#[async_trait::async_trait]
impl PageSource<AgencySearch, Agency> for BayutClient {
    async fn fetch_page(
        &self,
        ctx: &AgencySearch,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<Agency>> {
        self.list_agencies(&ctx.0, page, page_size).await
    }
}

#[async_trait::async_trait]
impl PageSource<AgencySlug, PropertySummary> for BayutClient {
    async fn fetch_page(
        &self,
        ctx: &AgencySlug,
        page: u32,
        page_size: u32,
    ) -> Result<Vec<PropertySummary>> {
        self.agency_listings(&ctx.0, page, page_size).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redacted_header_display() {
        let header = RedactedHeader::new("secret-api-key-12345");
        assert_eq!(format!("{}", header), "[REDACTED]");
    }

    #[test]
    fn test_redacted_header_debug() {
        let header = RedactedHeader::new("secret-api-key-12345");
        let debug_str = format!("{:?}", header);
        assert!(debug_str.contains("[REDACTED]"));
        assert!(!debug_str.contains("secret-api-key"));
    }

    #[test]
    fn test_redacted_header_value_preserved() {
        let header = RedactedHeader::new("key-123");
        let value = header.as_header_value().unwrap();
        assert_eq!(value.to_str().unwrap(), "key-123");
    }

    #[test]
    fn test_invalid_header_characters_rejected() {
        let header = RedactedHeader::new("bad\nkey");
        assert!(header.as_header_value().is_err());
    }
}
