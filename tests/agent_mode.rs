mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{events_body, events_client, get_json, unreachable_base_url};
use city_events::agent::tool::{FetchEventsArgs, MISSING_CITY_MESSAGE};
use city_events::agent::{Converse, FetchEvents, GeminiConverser};
use city_events::api::{self, AppState, ChatBackend};
use city_events::error::{agent_error, ServiceResult};
use city_events::events::summary::NO_EVENTS_MESSAGE;
use mockito::Matcher;
use rig::providers::gemini::Client as GeminiClient;
use rig::tool::Tool;
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};

/// Converser that records queries and answers with a fixed script
struct ScriptedConverser {
    answer: Result<String, String>,
    seen: Mutex<Vec<String>>,
}

impl ScriptedConverser {
    fn answering(text: &str) -> Self {
        Self {
            answer: Ok(text.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            seen: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl Converse for ScriptedConverser {
    async fn converse(&self, query: &str) -> ServiceResult<String> {
        self.seen.lock().unwrap().push(query.to_string());
        match &self.answer {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(agent_error(message)),
        }
    }
}

fn agent_app(converser: Arc<ScriptedConverser>) -> axum::Router {
    api::router(AppState::new(ChatBackend::Agent(converser)))
}

/// The endpoint returns exactly the agent's final text
#[tokio::test]
async fn test_agent_answer_is_returned() {
    let converser = Arc::new(ScriptedConverser::answering(
        "Jazz Night - June 1, 8:00 PM at Blue Note",
    ));

    let (status, body) = get_json(
        agent_app(converser.clone()),
        "/api/v1/chat?query=events%20in%20Austin%20for%20jazz",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Jazz Night - June 1, 8:00 PM at Blue Note"));
    assert_eq!(
        *converser.seen.lock().unwrap(),
        vec!["events in Austin for jazz".to_string()]
    );
}

/// Agent mode needs the free-text query parameter
#[tokio::test]
async fn test_missing_query_is_422() {
    let converser = Arc::new(ScriptedConverser::answering("unused"));

    let (status, body) = get_json(agent_app(converser.clone()), "/api/v1/chat?city=Austin").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["detail"], "Missing required query parameter: query");
    assert!(converser.seen.lock().unwrap().is_empty());
}

/// A failing agent runtime maps to 500
#[tokio::test]
async fn test_agent_failure_is_500() {
    let converser = Arc::new(ScriptedConverser::failing("model overloaded"));

    let (status, body) = get_json(agent_app(converser), "/api/v1/chat?query=hello").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("Unexpected error:"));
    assert!(detail.contains("model overloaded"));
}

/// The tool advertises one required parameter
#[tokio::test]
async fn test_tool_definition() {
    let tool = FetchEvents::new(events_client("http://127.0.0.1:1"));

    let definition = tool.definition(String::new()).await;

    assert_eq!(definition.name, "fetch_events");
    assert_eq!(definition.description, "Find events that are happening in a city");
    assert_eq!(definition.parameters["required"], json!(["city"]));
    assert_eq!(definition.parameters["properties"]["keyword"]["type"], "string");
}

/// Tool output for found and empty searches
#[tokio::test]
async fn test_tool_summarizes_results() {
    let mut server = mockito::Server::new_async().await;
    let _found = server
        .mock("GET", "/discovery/v2/events.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("city".into(), "Austin".into()),
            Matcher::UrlEncoded("keyword".into(), "".into()),
        ]))
        .with_status(200)
        .with_body(events_body(&["Jazz Night"]))
        .create_async()
        .await;
    let _empty = server
        .mock("GET", "/discovery/v2/events.json")
        .match_query(Matcher::UrlEncoded("city".into(), "Nowhere".into()))
        .with_status(200)
        .with_body("{}")
        .create_async()
        .await;

    let tool = FetchEvents::new(events_client(&server.url()));

    let text = tool.call(FetchEventsArgs::new("Austin", None)).await.unwrap();
    assert!(text.starts_with("Jazz Night, "));
    assert!(text.contains("2025-06-01"));

    let text = tool.call(FetchEventsArgs::new("Nowhere", None)).await.unwrap();
    assert_eq!(text, NO_EVENTS_MESSAGE);
}

/// Failures and missing cities come back as conversation text
#[tokio::test]
async fn test_tool_reports_problems_as_text() {
    let tool = FetchEvents::new(events_client(&unreachable_base_url()));

    let text = tool.call(FetchEventsArgs::new("Austin", None)).await.unwrap();
    assert!(text.starts_with("Failed to fetch events:"));

    let text = tool.call(FetchEventsArgs::new("", None)).await.unwrap();
    assert_eq!(text, MISSING_CITY_MESSAGE);
}

/// A call without a city still reaches the tool and asks for one
#[tokio::test]
async fn test_tool_call_without_city_asks_for_one() {
    let tool = FetchEvents::new(events_client(&unreachable_base_url()));

    let args: FetchEventsArgs = serde_json::from_value(json!({"keyword": "jazz"})).unwrap();
    assert_eq!(args, FetchEventsArgs::new("", Some("jazz")));

    let text = tool.call(args).await.unwrap();
    assert_eq!(text, MISSING_CITY_MESSAGE);
}

/// `generateContent` reply carrying a single part
fn gemini_reply(part: Value) -> String {
    json!({
        "candidates": [{
            "content": {"role": "model", "parts": [part]},
            "finishReason": "STOP",
            "index": 0
        }],
        "usageMetadata": {
            "promptTokenCount": 12,
            "candidatesTokenCount": 8,
            "totalTokenCount": 20
        },
        "modelVersion": "gemini-2.0-flash"
    })
    .to_string()
}

async fn mock_model_turn(
    server: &mut mockito::ServerGuard,
    body: Option<Matcher>,
    reply: Value,
) -> mockito::Mock {
    let mut mock = server
        .mock("POST", Matcher::Regex("generateContent".into()))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(gemini_reply(reply))
        .expect(1);
    if let Some(body) = body {
        mock = mock.match_body(body);
    }
    mock.create_async().await
}

fn gemini_app(model_url: &str, events_url: &str) -> axum::Router {
    let converser = GeminiConverser::with_client(
        GeminiClient::from_url("test-key", model_url),
        "gemini-2.0-flash",
        events_client(events_url),
    );
    api::router(AppState::new(ChatBackend::Agent(Arc::new(converser))))
}

/// Tool output goes back to the model and the endpoint returns the model's final text
#[tokio::test]
async fn test_gemini_answers_after_tool_round_trip() {
    let mut events = mockito::Server::new_async().await;
    let events_mock = events
        .mock("GET", "/discovery/v2/events.json")
        .match_query(Matcher::UrlEncoded("city".into(), "Austin".into()))
        .with_status(200)
        .with_body(events_body(&["Jazz Night"]))
        .create_async()
        .await;

    let mut model = mockito::Server::new_async().await;
    let tool_call = mock_model_turn(
        &mut model,
        None,
        json!({"functionCall": {"name": "fetch_events", "args": {"city": "Austin"}}}),
    )
    .await;
    let final_answer = mock_model_turn(
        &mut model,
        Some(Matcher::AllOf(vec![
            Matcher::Regex("functionResponse".into()),
            Matcher::Regex("Jazz Night".into()),
        ])),
        json!({"text": "Jazz Night - June 1 at 8:00 PM, Austin"}),
    )
    .await;

    let (status, body) = get_json(
        gemini_app(&model.url(), &events.url()),
        "/api/v1/chat?query=events%20in%20Austin",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Jazz Night - June 1 at 8:00 PM, Austin"));
    tool_call.assert_async().await;
    final_answer.assert_async().await;
    events_mock.assert_async().await;
}

/// A tool call without a city is answered with text, not a failed request
#[tokio::test]
async fn test_gemini_tool_call_without_city_is_answered() {
    let mut model = mockito::Server::new_async().await;
    let tool_call = mock_model_turn(
        &mut model,
        None,
        json!({"functionCall": {"name": "fetch_events", "args": {"keyword": "jazz"}}}),
    )
    .await;
    let final_answer = mock_model_turn(
        &mut model,
        Some(Matcher::AllOf(vec![
            Matcher::Regex("functionResponse".into()),
            Matcher::Regex("A city is required".into()),
        ])),
        json!({"text": "Which city should I look in?"}),
    )
    .await;

    let (status, body) = get_json(
        gemini_app(&model.url(), &unreachable_base_url()),
        "/api/v1/chat?query=any%20jazz%20concerts",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("Which city should I look in?"));
    tool_call.assert_async().await;
    final_answer.assert_async().await;
}
