//! The gateway HTTP client.

use log::{error, info};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use crate::config::GatewayConfig;
use crate::error::{GatewayError, Result};
use crate::models::{ChatCompletionResponse, ChatMessage, ToolResponse};
use crate::sse::{self, StreamOutcome};

const AGENT_ID_HEADER: &str = "x-clawdbot-agent-id";
const DEFAULT_SESSION_KEY: &str = "main";

/// Client for the assistant gateway.
///
/// One client instance is shared by all route handlers; the underlying
/// `reqwest::Client` pools connections internally.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(headers).build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Invoke a gateway tool through the `/tools/invoke` envelope.
    pub async fn invoke_tool(
        &self,
        tool: &str,
        args: Value,
        session_key: &str,
    ) -> Result<ToolResponse> {
        let url = format!("{}/tools/invoke", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.config.auth_header())
            .json(&json!({
                "tool": tool,
                "args": args,
                "sessionKey": session_key,
            }))
            .send()
            .await?;
        let response = Self::check_status(response).await?;
        Ok(response.json().await?)
    }

    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("gateway request failed: HTTP {status}: {body}");
        Err(GatewayError::Http {
            status: status.as_u16(),
            body,
        })
    }

    async fn send_chat(
        &self,
        messages: &[ChatMessage],
        user: &str,
        stream: bool,
    ) -> Result<Response> {
        let url = format!("{}/v1/chat/completions", self.config.base_url);
        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, self.config.auth_header())
            .header(AGENT_ID_HEADER, &self.config.agent_id)
            .json(&json!({
                "model": self.config.model,
                "stream": stream,
                "messages": messages,
                "user": user,
            }))
            .send()
            .await?;
        Self::check_status(response).await
    }

    /// Streaming chat completion.
    ///
    /// Issues one request and feeds the response body through the token
    /// aggregator; `on_token` fires once per content fragment in arrival
    /// order. There is no retry here: a failed stream is reported once and
    /// retrying is up to the caller.
    pub async fn chat_stream<F>(
        &self,
        messages: &[ChatMessage],
        user: &str,
        cancel: CancellationToken,
        on_token: F,
    ) -> Result<StreamOutcome>
    where
        F: FnMut(&str),
    {
        info!("starting chat stream with {} messages", messages.len());
        let response = self.send_chat(messages, user, true).await?;
        let stream = Box::pin(response.bytes_stream());
        sse::aggregate(stream, cancel, on_token).await
    }

    /// Non-streaming chat completion; returns the assistant's message text.
    pub async fn chat_simple(&self, messages: &[ChatMessage], user: &str) -> Result<String> {
        let response = self.send_chat(messages, user, false).await?;
        let data: ChatCompletionResponse = response.json().await?;
        Ok(data.message_content().unwrap_or("No response").to_string())
    }

    // --- Convenience wrappers over tool invocation ---

    pub async fn list_cron_jobs(&self) -> Result<ToolResponse> {
        self.invoke_tool("cron", json!({ "action": "list" }), DEFAULT_SESSION_KEY)
            .await
    }

    pub async fn run_cron_job(&self, job_id: &str) -> Result<ToolResponse> {
        self.invoke_tool(
            "cron",
            json!({ "action": "run", "jobId": job_id }),
            DEFAULT_SESSION_KEY,
        )
        .await
    }

    pub async fn toggle_cron_job(&self, job_id: &str, enabled: bool) -> Result<ToolResponse> {
        self.invoke_tool(
            "cron",
            json!({
                "action": "update",
                "jobId": job_id,
                "patch": { "enabled": enabled },
            }),
            DEFAULT_SESSION_KEY,
        )
        .await
    }

    pub async fn session_status(&self) -> Result<ToolResponse> {
        self.invoke_tool("session_status", json!({}), DEFAULT_SESSION_KEY)
            .await
    }

    pub async fn read_file(&self, path: &str) -> Result<ToolResponse> {
        self.invoke_tool("read", json!({ "path": path }), DEFAULT_SESSION_KEY)
            .await
    }
}
