#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use city_events::api::{self, AppState, ChatBackend};
use city_events::config::QueryOptions;
use city_events::events::TicketmasterClient;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::time::Duration;
use tower::ServiceExt;

/// Build an events client pointed at a mock upstream
pub fn events_client(base_url: &str) -> TicketmasterClient {
    TicketmasterClient::new("test-key", base_url, QueryOptions::default(), Duration::from_secs(5))
        .expect("valid test client")
}

/// Router answering in direct mode against `base_url`
pub fn direct_app(base_url: &str) -> Router {
    api::router(AppState::new(ChatBackend::Direct(events_client(base_url))))
}

/// A base URL nothing listens on
pub fn unreachable_base_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local address");
    drop(listener);
    format!("http://{}", addr)
}

/// Send a GET through the router and return status plus parsed JSON body
pub async fn get_json(app: Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

/// Upstream body with the given event names, in order
pub fn events_body(names: &[&str]) -> String {
    let events: Vec<Value> = names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            json!({
                "name": name,
                "id": format!("evt-{}", i),
                "dates": {"start": {"localDate": format!("2025-06-0{}", i + 1), "localTime": "20:00:00"}},
                "place": {"city": {"name": "Austin"}}
            })
        })
        .collect();

    json!({
        "_embedded": {"events": events},
        "page": {"size": 5, "totalElements": names.len(), "number": 0}
    })
    .to_string()
}
