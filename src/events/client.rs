use super::models::{EventQuery, EventSearchResult, SearchResponse};
use super::time::format_timestamp;
use crate::config::{Config, QueryOptions};
use crate::error::{
    config_error, upstream_data_error, upstream_transport_error, Error, ServiceResult,
};
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Path of the events search endpoint, relative to the configured base URL
pub const EVENTS_PATH: &str = "discovery/v2/events.json";

/// Longest slice of an upstream error body kept in error messages
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Client for the Ticketmaster Discovery events search
#[derive(Debug, Clone)]
pub struct TicketmasterClient {
    client: Client,
    api_key: String,
    base_url: Url,
    options: QueryOptions,
}

impl TicketmasterClient {
    /// Create a client with its own connection pool and request timeout
    pub fn new(
        api_key: impl Into<String>,
        base_url: &str,
        options: QueryOptions,
        timeout: Duration,
    ) -> ServiceResult<Self> {
        let mut base_url = Url::parse(base_url)
            .map_err(|e| config_error(&format!("Invalid Ticketmaster base URL: {}", e)))?;

        // A base without a trailing slash would lose its last path segment on join
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| config_error(&format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            base_url,
            options,
        })
    }

    /// Create a client from the service configuration
    pub fn from_config(config: &Config) -> ServiceResult<Self> {
        Self::new(
            config.ticketmaster_api_key.clone(),
            &config.ticketmaster_base_url,
            config.query.clone(),
            config.request_timeout,
        )
    }

    /// Build the outbound search URL for `query` as of `now`
    pub fn build_request_url(
        &self,
        query: &EventQuery,
        now: DateTime<Utc>,
    ) -> ServiceResult<Url> {
        let mut url = self
            .base_url
            .join(EVENTS_PATH)
            .map_err(|e| config_error(&format!("Failed to build events URL: {}", e)))?;

        {
            let mut pairs = url.query_pairs_mut();
            pairs
                .append_pair("apikey", &self.api_key)
                .append_pair("city", query.city.trim())
                .append_pair("keyword", &query.keyword)
                .append_pair("size", &self.options.page_size.to_string())
                .append_pair("page", &self.options.page.to_string())
                .append_pair("sort", &self.options.sort);

            if self.options.start_date_filter {
                pairs.append_pair("startDateTime", &format_timestamp(now));
            }
        }

        Ok(url)
    }

    /// Search for upcoming events matching `query`
    #[tracing::instrument(skip(self, query), fields(city = %query.city, keyword = %query.keyword))]
    pub async fn find_events(&self, query: &EventQuery) -> ServiceResult<EventSearchResult> {
        query.validate()?;

        let url = self.build_request_url(query, Utc::now())?;

        // Strip the URL from transport errors so the API key never reaches a response
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| upstream_transport_error(&e.without_url().to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| upstream_transport_error(&e.without_url().to_string()))?;

        if !status.is_success() {
            warn!("Events API responded with HTTP {}", status);
            return Err(Error::UpstreamStatus {
                status: status.as_u16(),
                message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let parsed: SearchResponse = serde_json::from_str(&body)
            .map_err(|e| upstream_data_error(&e.to_string()))?;

        let result = EventSearchResult::from(parsed);
        if result.is_empty() {
            info!("No events found");
        } else {
            debug!(count = result.len(), "Fetched events");
        }

        Ok(result)
    }
}
