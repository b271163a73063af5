use super::models::EventSearchResult;
use serde_json::Value;

/// Tool output when the search came back empty
pub const NO_EVENTS_MESSAGE: &str = "No events found in the given city.";

/// Flatten a search result into the text handed back to the agent.
///
/// Each event contributes its name, dates and place in that order, all joined by `", "`.
pub fn summarize(result: &EventSearchResult) -> String {
    if result.is_empty() {
        return NO_EVENTS_MESSAGE.to_string();
    }

    let mut parts = Vec::with_capacity(result.len() * 3);
    for event in result.events() {
        parts.push(event.name.clone());
        parts.push(render_opaque(event.dates.as_ref()));
        parts.push(render_opaque(event.place.as_ref()));
    }
    parts.join(", ")
}

fn render_opaque(value: Option<&Value>) -> String {
    value.map_or_else(|| "null".to_string(), Value::to_string)
}
