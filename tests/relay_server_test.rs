//! Relay routes against a mocked assistant platform

mod support;

use assistant_relay::client::AssistantsClient;
use assistant_relay::config::{AppEnvironment, RelayConfig};
use assistant_relay::server::{AppState, router};
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use axum::response::Response;
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_json, body_partial_json, header as header_eq, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn state(config: RelayConfig) -> AppState {
    let client = AssistantsClient::new(&config, reqwest::Client::new());
    AppState::new(client, config)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    response.into_body().collect().await.unwrap().to_bytes().to_vec()
}

async fn body_value(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn create_thread_returns_thread_id() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .and(header_eq("openai-beta", "assistants=v2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "thread_abc", "object": "thread"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = router(state(support::relay_config(&upstream)));
    let response = app
        .oneshot(post_json("/api/assistants/threads", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    assert_eq!(body_value(response).await, json!({"threadId": "thread_abc"}));
}

#[tokio::test]
async fn create_assistant_registers_tools() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/assistants"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "tools": [
                {"type": "code_interpreter"},
                {"type": "function", "function": {"name": "get_weather"}},
                {"type": "file_search"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "asst_new", "object": "assistant"})))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = router(state(support::relay_config(&upstream)));
    let response = app.oneshot(post_json("/api/assistants", json!({}))).await.unwrap();

    assert_eq!(body_value(response).await, json!({"assistantId": "asst_new"}));
}

#[tokio::test]
async fn send_message_relays_run_stream_unchanged() {
    let upstream = MockServer::start().await;
    let sse = support::read_fixture("text_run.sse");

    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_abc/messages"))
        .and(body_json(json!({"role": "user", "content": "Plot it"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "msg_user", "role": "user"})))
        .expect(1)
        .mount(&upstream)
        .await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_abc/runs"))
        .and(header_eq("accept", "text/event-stream"))
        .and(body_json(json!({
            "assistant_id": "asst_1",
            "stream": true,
            "temperature": 0.5,
            "max_completion_tokens": 500
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse.clone(), "text/event-stream"))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = router(state(support::relay_config(&upstream)));
    let response = app
        .oneshot(post_json(
            "/api/assistants/threads/thread_abc/messages",
            json!({"content": "Plot it"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/event-stream");
    assert_eq!(body_bytes(response).await, sse.into_bytes());
}

#[tokio::test]
async fn actions_submit_outputs_and_relay_resumed_stream() {
    let upstream = MockServer::start().await;
    let sse = support::read_fixture("resumed_run.sse");

    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_abc/runs/run_fn/submit_tool_outputs"))
        .and(body_json(json!({
            "tool_outputs": [{"output": "{\"temperature\":70}", "tool_call_id": "call_paris"}],
            "stream": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_raw(sse.clone(), "text/event-stream"))
        .expect(1)
        .mount(&upstream)
        .await;

    let app = router(state(support::relay_config(&upstream)));
    let response = app
        .oneshot(post_json(
            "/api/assistants/threads/thread_abc/actions",
            json!({
                "runId": "run_fn",
                "toolCallOutputs": [{"output": "{\"temperature\":70}", "tool_call_id": "call_paris"}]
            }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, sse.into_bytes());
}

#[tokio::test]
async fn file_route_relays_bytes_and_content_type() {
    let upstream = MockServer::start().await;
    let png = vec![0x89, b'P', b'N', b'G', 0, 1, 2, 3];
    Mock::given(method("GET"))
        .and(path("/v1/files/file-plot/content"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(png.clone(), "image/png"))
        .mount(&upstream)
        .await;

    let app = router(state(support::relay_config(&upstream)));
    let response = app
        .oneshot(Request::get("/api/files/file-plot").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(body_bytes(response).await, png);
}

#[tokio::test]
async fn file_id_cannot_escape_the_file_route() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/assistants"))
        .respond_with(ResponseTemplate::new(200).set_body_string("assistant list"))
        .mount(&upstream)
        .await;

    let app = router(state(support::relay_config(&upstream)));
    let response = app
        .clone()
        .oneshot(Request::get("/api/files/..%2Fassistants%3F").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(!String::from_utf8_lossy(&body_bytes(response).await).contains("assistant list"));

    let response = app
        .oneshot(Request::get("/api/files/%2E%2E").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let seen = upstream.received_requests().await.unwrap();
    let paths: Vec<&str> = seen.iter().map(|r| r.url.path()).collect();
    assert_eq!(paths, vec!["/v1/files/..%2Fassistants%3F/content"]);
}

#[tokio::test]
async fn thread_id_cannot_escape_the_messages_route() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/assistants"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "asst_x"})))
        .mount(&upstream)
        .await;

    let app = router(state(support::relay_config(&upstream)));
    let response = app
        .oneshot(post_json(
            "/api/assistants/threads/..%2F..%2Fassistants%3F/messages",
            json!({"content": "hi"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let seen = upstream.received_requests().await.unwrap();
    assert!(seen.iter().all(|r| r.url.path().starts_with("/v1/threads/")));
    assert_eq!(seen[0].url.path(), "/v1/threads/..%2F..%2Fassistants%3F/messages");
}

#[tokio::test]
async fn missing_assistant_id_is_a_configuration_error() {
    let upstream = MockServer::start().await;
    let config = RelayConfig::new("sk-test").with_base_url(format!("{}/v1", upstream.uri()));

    let app = router(state(config));
    let response = app
        .oneshot(post_json(
            "/api/assistants/threads/thread_abc/messages",
            json!({"content": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_value(response).await;
    assert!(body["error"].as_str().unwrap().contains("OPENAI_ASSISTANT_ID"));
    assert!(upstream.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn upstream_not_found_keeps_status() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads/thread_gone/messages"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"message": "No thread found with id 'thread_gone'.", "type": "invalid_request_error"}
        })))
        .mount(&upstream)
        .await;

    let config = support::relay_config(&upstream).with_environment(AppEnvironment::Production);
    let app = router(state(config));
    let response = app
        .oneshot(post_json(
            "/api/assistants/threads/thread_gone/messages",
            json!({"content": "hi"}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(body_value(response).await["error"].as_str().unwrap().contains("thread_gone"));
}

#[tokio::test]
async fn production_masks_upstream_failures() {
    let upstream = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/threads"))
        .respond_with(ResponseTemplate::new(500).set_body_string("stack trace with secrets"))
        .mount(&upstream)
        .await;

    let config = support::relay_config(&upstream).with_environment(AppEnvironment::Production);
    let response = router(state(config))
        .oneshot(post_json("/api/assistants/threads", json!({})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_value(response).await, json!({"error": "internal error"}));
}

#[tokio::test]
async fn malformed_body_is_a_bad_request() {
    let upstream = MockServer::start().await;
    let app = router(state(support::relay_config(&upstream)));
    let response = app
        .oneshot(post_json(
            "/api/assistants/threads/thread_abc/actions",
            json!({"runId": 7}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(body_value(response).await["error"].is_string());
}
