use crate::events::{summarize, EventQuery, TicketmasterClient};
use rig::completion::ToolDefinition;
use rig::tool::Tool;
use serde::Deserialize;
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

/// Tool output when the model calls the tool without a city
pub const MISSING_CITY_MESSAGE: &str =
    "A city is required to search for events. Ask the user which city they are interested in.";

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Events lookup task failed: {0}")]
    Task(String),
}

/// Arguments the model passes to `fetch_events`.
///
/// Every field is optional on the wire so a call without a city still reaches the tool
/// and is answered with [`MISSING_CITY_MESSAGE`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct FetchEventsArgs {
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub keyword: Option<String>,
}

impl FetchEventsArgs {
    pub fn new(city: impl Into<String>, keyword: Option<&str>) -> Self {
        Self {
            city: city.into(),
            keyword: keyword.map(str::to_string),
        }
    }
}

impl From<FetchEventsArgs> for EventQuery {
    fn from(args: FetchEventsArgs) -> Self {
        EventQuery::new(args.city, args.keyword)
    }
}

/// `fetch_events(city, keyword?)`: the single tool offered to the agent
#[derive(Debug, Clone)]
pub struct FetchEvents {
    client: TicketmasterClient,
}

impl FetchEvents {
    pub fn new(client: TicketmasterClient) -> Self {
        Self { client }
    }

    /// Run a search and render the outcome as conversation text.
    ///
    /// Upstream failures become text too, so the agent can tell the user what went wrong.
    pub async fn run(client: &TicketmasterClient, query: EventQuery) -> String {
        if query.validate().is_err() {
            return MISSING_CITY_MESSAGE.to_string();
        }

        info!("Agent requested events for {}", query.city);
        match client.find_events(&query).await {
            Ok(result) => summarize(&result),
            Err(e) => {
                warn!("Events lookup for the agent failed: {}", e);
                format!("Failed to fetch events: {}", e)
            }
        }
    }
}

impl Tool for FetchEvents {
    const NAME: &'static str = "fetch_events";

    type Error = ToolError;
    type Args = FetchEventsArgs;
    type Output = String;

    async fn definition(&self, _prompt: String) -> ToolDefinition {
        ToolDefinition {
            name: Self::NAME.to_string(),
            description: "Find events that are happening in a city".to_string(),
            parameters: json!({
                "type": "object",
                "properties": {
                    "city": {"type": "string"},
                    "keyword": {"type": "string"}
                },
                "required": ["city"]
            }),
        }
    }

    async fn call(&self, args: Self::Args) -> Result<Self::Output, Self::Error> {
        // rig needs a Sync future here and reqwest's are not, so the lookup runs on its own task
        let client = self.client.clone();
        tokio::spawn(async move { Self::run(&client, args.into()).await })
            .await
            .map_err(|e| ToolError::Task(e.to_string()))
    }
}
