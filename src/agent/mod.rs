use crate::error::ServiceResult;
use async_trait::async_trait;

pub mod gemini;
pub mod tool;

pub use gemini::GeminiConverser;
pub use tool::FetchEvents;

/// Instruction the agent runs under for every conversation
pub const SYSTEM_PROMPT: &str = "You are an assistant that finds events in a city using the fetch_events tool.
The keyword is optional. Do NOT include a keyword if the user did not give one.
If no city is given, ask the user for one instead of calling the tool.
Return each event with its name, date, time and place. Do not include the status.";

/// Capability to turn one user query into one final answer
#[async_trait]
pub trait Converse: Send + Sync {
    /// Send `query` and wait for the terminal result text
    async fn converse(&self, query: &str) -> ServiceResult<String>;
}
