use super::tool::{FetchEvents, FetchEventsArgs};
use super::{Converse, SYSTEM_PROMPT};
use crate::config::Config;
use crate::error::{agent_error, env_error, ServiceResult};
use crate::events::TicketmasterClient;
use async_trait::async_trait;
use rig::agent::Agent;
use rig::completion::{AssistantContent, Completion, Message};
use rig::completion::message::{Text, ToolCall, ToolResult, ToolResultContent, UserContent};
use rig::providers::gemini::completion::CompletionModel;
use rig::providers::gemini::Client as GeminiClient;
use rig::tool::Tool;
use rig::OneOrMany;
use serde_json::Value;
use tracing::{debug, error, info, warn};

/// Model round trips allowed for one query before giving up
pub const MAX_TURNS: usize = 4;

/// Converses through a Gemini-backed rig agent that owns the `fetch_events` tool.
///
/// Tool calls are run here and their output is sent back to the model, so the
/// answer is always the model's own text.
pub struct GeminiConverser {
    agent: Agent<CompletionModel>,
    tool: FetchEvents,
}

impl GeminiConverser {
    pub fn new(api_key: &str, model: &str, events: TicketmasterClient) -> Self {
        Self::with_client(GeminiClient::new(api_key), model, events)
    }

    /// Build the converser on an existing Gemini client
    pub fn with_client(
        gemini_client: GeminiClient,
        model: &str,
        events: TicketmasterClient,
    ) -> Self {
        info!("Using Gemini model: {}", model);

        let tool = FetchEvents::new(events);
        let agent = gemini_client
            .agent(model)
            .preamble(SYSTEM_PROMPT)
            .tool(tool.clone())
            .build();

        Self { agent, tool }
    }

    /// Build the converser from configuration; agent mode needs a Gemini key
    pub fn from_config(config: &Config, events: TicketmasterClient) -> ServiceResult<Self> {
        let api_key = config
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| env_error("GEMINI_API_KEY"))?;

        Ok(Self::new(api_key, &config.gemini_model, events))
    }

    async fn complete(
        &self,
        prompt: Message,
        history: Vec<Message>,
    ) -> ServiceResult<Vec<AssistantContent>> {
        let request = self.agent.completion(prompt, history).await.map_err(|e| {
            error!("Failed to build agent request: {}", e);
            agent_error(&e.to_string())
        })?;

        let response = request.send().await.map_err(|e| {
            error!("Agent request failed: {}", e);
            agent_error(&e.to_string())
        })?;

        Ok(response.choice.into_iter().collect())
    }

    /// Run one tool call and render its output as the JSON text the model expects back
    async fn run_tool(&self, call: &ToolCall) -> String {
        let output = if call.function.name != FetchEvents::NAME {
            warn!("Agent called unknown tool {}", call.function.name);
            format!("Unknown tool: {}", call.function.name)
        } else {
            match serde_json::from_value::<FetchEventsArgs>(call.function.arguments.clone()) {
                Ok(args) => match self.tool.call(args).await {
                    Ok(text) => text,
                    Err(e) => format!("Failed to fetch events: {}", e),
                },
                Err(e) => format!("Invalid arguments for {}: {}", FetchEvents::NAME, e),
            }
        };

        Value::String(output).to_string()
    }
}

#[async_trait]
impl Converse for GeminiConverser {
    async fn converse(&self, query: &str) -> ServiceResult<String> {
        info!("Sending query to agent");

        let mut history: Vec<Message> = Vec::new();
        let mut prompt = Message::from(query.to_owned());

        for turn in 1..=MAX_TURNS {
            let choice = self.complete(prompt.clone(), history.clone()).await?;
            history.push(prompt);

            let mut text = Vec::new();
            let mut calls = Vec::new();
            for content in choice {
                match content {
                    AssistantContent::Text(Text { text: part }) => text.push(part),
                    AssistantContent::ToolCall(call) => calls.push(call),
                }
            }

            if calls.is_empty() {
                info!("Received response from agent after {} turn(s)", turn);
                return Ok(text.join("\n"));
            }

            debug!(turn, calls = calls.len(), "Agent requested tool calls");

            let mut results = Vec::with_capacity(calls.len());
            for call in &calls {
                let output = self.run_tool(call).await;
                results.push(UserContent::ToolResult(ToolResult {
                    id: call.id.clone(),
                    content: OneOrMany::one(ToolResultContent::Text(Text { text: output })),
                }));
            }

            let requested: Vec<AssistantContent> =
                calls.into_iter().map(AssistantContent::ToolCall).collect();
            history.push(Message::Assistant {
                content: OneOrMany::many(requested).map_err(|e| agent_error(&e.to_string()))?,
            });
            prompt = Message::User {
                content: OneOrMany::many(results).map_err(|e| agent_error(&e.to_string()))?,
            };
        }

        error!("Agent did not answer within {} turns", MAX_TURNS);
        Err(agent_error(&format!("no final answer after {} model turns", MAX_TURNS)))
    }
}
