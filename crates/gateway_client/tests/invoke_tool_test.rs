use gateway_client::{GatewayClient, GatewayConfig, GatewayError};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(base_url: String) -> GatewayConfig {
    GatewayConfig {
        base_url,
        token: "session-token".to_string(),
        ..GatewayConfig::default()
    }
}

#[tokio::test]
async fn invoke_tool_sends_envelope_and_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tools/invoke"))
        .and(header("Authorization", "Bearer session-token"))
        .and(body_partial_json(json!({
            "tool": "cron",
            "args": { "action": "list" },
            "sessionKey": "main",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": { "jobs": [{ "id": "j1", "enabled": true }] }
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let response = client.list_cron_jobs().await.expect("tool response");

    assert!(response.ok);
    let result = response.into_result().expect("ok envelope").expect("result");
    let jobs = gateway_client::models::decode_cron_jobs(&result);
    assert_eq!(jobs.len(), 1);
    assert_eq!(jobs[0].id, "j1");
}

#[tokio::test]
async fn toggle_cron_job_sends_enabled_patch() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tools/invoke"))
        .and(body_partial_json(json!({
            "tool": "cron",
            "args": {
                "action": "update",
                "jobId": "j7",
                "patch": { "enabled": false },
            },
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let response = client.toggle_cron_job("j7", false).await.expect("response");
    assert!(response.ok);
}

#[tokio::test]
async fn invoke_tool_surfaces_gateway_error_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tools/invoke"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": false,
            "error": { "type": "tool_error", "message": "cron store unavailable" }
        })))
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let response = client.session_status().await.expect("envelope");
    let err = response.into_result().expect_err("expected gateway error");
    match err {
        GatewayError::Gateway { kind, message } => {
            assert_eq!(kind, "tool_error");
            assert!(message.contains("cron store"));
        }
        other => panic!("expected gateway error, got {other:?}"),
    }
}

#[tokio::test]
async fn invoke_tool_maps_http_status_errors() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/tools/invoke"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
        .mount(&server)
        .await;

    let client = GatewayClient::new(test_config(server.uri())).expect("client");
    let err = client.session_status().await.expect_err("expected failure");
    match err {
        GatewayError::Http { status, .. } => assert_eq!(status, 401),
        other => panic!("expected HTTP error, got {other:?}"),
    }
}
