use crate::error::{invalid_query_error, ServiceResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A request for events in a city
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventQuery {
    pub city: String,
    /// Free-text keyword; an omitted keyword is the empty string
    #[serde(default)]
    pub keyword: String,
}

impl EventQuery {
    pub fn new(city: impl Into<String>, keyword: Option<String>) -> Self {
        Self {
            city: city.into(),
            keyword: keyword.unwrap_or_default(),
        }
    }

    /// Reject queries without a usable city
    pub fn validate(&self) -> ServiceResult<()> {
        if self.city.trim().is_empty() {
            return Err(invalid_query_error("city must not be empty"));
        }
        Ok(())
    }
}

/// A single event as returned by the events API.
///
/// `dates` and `place` belong to the upstream schema and are passed through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dates: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<Value>,
}

/// Outcome of an events search
#[derive(Debug, Clone, PartialEq)]
pub enum EventSearchResult {
    Empty,
    /// Events in the order the API returned them
    Found(Vec<Event>),
}

impl EventSearchResult {
    pub fn events(&self) -> &[Event] {
        match self {
            EventSearchResult::Empty => &[],
            EventSearchResult::Found(events) => events,
        }
    }

    pub fn len(&self) -> usize {
        self.events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events().is_empty()
    }
}

/// Direct-mode response body, mirroring the upstream event collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventList {
    pub events: Vec<Event>,
}

/// Top level of an events API response; the results sit under `_embedded`
#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    #[serde(rename = "_embedded")]
    pub embedded: Option<EmbeddedEvents>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct EmbeddedEvents {
    #[serde(default)]
    pub events: Vec<Event>,
}

impl From<SearchResponse> for EventSearchResult {
    fn from(response: SearchResponse) -> Self {
        match response.embedded {
            Some(embedded) if !embedded.events.is_empty() => {
                EventSearchResult::Found(embedded.events)
            }
            _ => EventSearchResult::Empty,
        }
    }
}
