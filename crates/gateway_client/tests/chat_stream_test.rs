use std::sync::{Arc, Mutex};

use gateway_client::{ChatMessage, GatewayClient, GatewayConfig, GatewayError, StreamOutcome};
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: String) -> GatewayConfig {
    GatewayConfig {
        base_url,
        password: "hunter2".to_string(),
        ..GatewayConfig::default()
    }
}

#[tokio::test]
async fn chat_stream_aggregates_tokens_and_completes() {
    let server = MockServer::start().await;

    let sse_body = concat!(
        "data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n",
        "data: not-json\n",
        "data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n",
        "data: [DONE]\n",
    );

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("Authorization", "Bearer hunter2"))
        .and(header("x-clawdbot-agent-id", "main"))
        .and(body_partial_json(
            serde_json::json!({ "stream": true, "model": "clawdbot:main" }),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string(sse_body),
        )
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let tokens = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&tokens);

    let outcome = client
        .chat_stream(
            &[ChatMessage::user("hi")],
            "test-user",
            CancellationToken::new(),
            move |token| sink.lock().unwrap().push(token.to_string()),
        )
        .await
        .expect("stream outcome");

    assert_eq!(outcome, StreamOutcome::Completed("Hello".to_string()));
    assert_eq!(*tokens.lock().unwrap(), vec!["Hel", "lo"]);
}

#[tokio::test]
async fn chat_stream_completes_when_body_ends_without_sentinel() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string("data: {\"choices\":[{\"delta\":{\"content\":\"partial\"}}]}\n"),
        )
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let outcome = client
        .chat_stream(
            &[ChatMessage::user("hi")],
            "test-user",
            CancellationToken::new(),
            |_| {},
        )
        .await
        .expect("stream outcome");

    assert_eq!(outcome, StreamOutcome::Completed("partial".to_string()));
}

#[tokio::test]
async fn chat_stream_cancelled_up_front_yields_cancelled() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("content-type", "text/event-stream")
                .set_body_string("data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n"),
        )
        .mount(&server)
        .await;

    let cancel = CancellationToken::new();
    cancel.cancel();

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let outcome = client
        .chat_stream(&[ChatMessage::user("hi")], "test-user", cancel, |_| {
            panic!("cancelled stream must not emit tokens")
        })
        .await
        .expect("stream outcome");

    assert_eq!(outcome, StreamOutcome::Cancelled);
}

#[tokio::test]
async fn chat_stream_maps_http_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("gateway overloaded"))
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let err = client
        .chat_stream(
            &[ChatMessage::user("hi")],
            "test-user",
            CancellationToken::new(),
            |_| {},
        )
        .await
        .expect_err("expected failure");

    match err {
        GatewayError::Http { status, body } => {
            assert_eq!(status, 503);
            assert!(body.contains("overloaded"));
        }
        other => panic!("expected HTTP error, got {other:?}"),
    }
}

#[tokio::test]
async fn chat_simple_returns_message_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({ "stream": false })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "All clear." } }]
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let response = client
        .chat_simple(&[ChatMessage::user("status?")], "test-user")
        .await
        .expect("response");

    assert_eq!(response, "All clear.");
}

#[tokio::test]
async fn chat_simple_defaults_when_content_missing() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let response = client
        .chat_simple(&[ChatMessage::user("status?")], "test-user")
        .await
        .expect("response");

    assert_eq!(response, "No response");
}
