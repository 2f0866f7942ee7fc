//! Terminal-client path end to end: chat session -> relay -> mocked platform

mod support;

use std::sync::Arc;

use assistant_relay::chat::{ChatSession, HttpTransport, Message, Role};
use assistant_relay::client::AssistantsClient;
use assistant_relay::functions::{WeatherFunctionHandler, WeatherReport};
use assistant_relay::server::{AppState, router};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Serve the relay on an ephemeral port and return its origin.
async fn spawn_relay(upstream: &MockServer) -> String {
    let config = support::relay_config(upstream);
    let client = AssistantsClient::new(&config, reqwest::Client::new());
    let app = router(AppState::new(client, config));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn weather_round_trip_resumes_the_run() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_abc"})))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_abc/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_user", "role": "user"})))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_abc/runs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(support::read_fixture("requires_action.sse"), "text/event-stream"),
        )
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_abc/runs/run_fn/submit_tool_outputs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(support::read_fixture("resumed_run.sse"), "text/event-stream"),
        )
        .expect(1)
        .mount(&upstream)
        .await;

    let relay = spawn_relay(&upstream).await;
    let weather = Arc::new(WeatherFunctionHandler::new());
    let mut session =
        ChatSession::with_handler(HttpTransport::new(&relay, reqwest::Client::new()), weather.clone());

    session.send("Weather in Paris and Oslo?").await.unwrap();

    assert_eq!(session.thread_id().map(|t| t.as_str()), Some("thread_abc"));
    assert_eq!(
        session.transcript().messages(),
        &[
            Message::new(Role::User, "Weather in Paris and Oslo?"),
            Message::new(Role::Assistant, "Paris and Oslo both have weather."),
        ]
    );
    assert!(!session.transcript().input_disabled());

    // Both calls were answered in one submission, in call order.
    let requests = upstream.received_requests().await.unwrap();
    let submit = requests
        .iter()
        .find(|r| r.url.path().ends_with("/submit_tool_outputs"))
        .expect("tool outputs submitted");
    let body: Value = serde_json::from_slice(&submit.body).unwrap();
    let outputs = body["tool_outputs"].as_array().unwrap();
    assert_eq!(outputs.len(), 2);
    assert_eq!(outputs[0]["tool_call_id"], "call_paris");
    assert_eq!(outputs[1]["tool_call_id"], "call_oslo");
    for output in outputs {
        let report: WeatherReport = serde_json::from_str(output["output"].as_str().unwrap()).unwrap();
        assert!((50..=90).contains(&report.temperature));
    }
    assert_eq!(body["stream"], true);

    assert!(weather.latest().await.is_some());
}
