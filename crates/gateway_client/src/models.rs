//! Request and response shapes for the gateway API.
//!
//! The gateway speaks two dialects: a tool envelope (`/tools/invoke`) and an
//! OpenAI-compatible chat completions API. Stream chunk types are deliberately
//! lenient: every field the aggregator does not need is optional or defaulted,
//! because the gateway occasionally interleaves keep-alive and role-only
//! records between content deltas.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

// --- Tool invocation envelope ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolError {
    #[serde(rename = "type")]
    pub kind: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResponse<T = Value> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl<T> ToolResponse<T> {
    /// Unwrap the envelope, mapping a gateway-side failure to [`GatewayError`].
    pub fn into_result(self) -> Result<Option<T>, GatewayError> {
        if self.ok {
            return Ok(self.result);
        }
        let error = self.error.unwrap_or(ToolError {
            kind: "unknown".to_string(),
            message: "gateway reported failure without detail".to_string(),
        });
        Err(GatewayError::Gateway {
            kind: error.kind,
            message: error.message,
        })
    }
}

// --- Streaming chat completion chunks ---

#[derive(Debug, Deserialize)]
pub struct ChatCompletionStreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
}

#[derive(Debug, Deserialize)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct StreamDelta {
    pub content: Option<String>,
    pub role: Option<String>,
}

impl ChatCompletionStreamChunk {
    /// Incremental text carried by this chunk, when any.
    pub fn delta_content(&self) -> Option<&str> {
        self.choices.first().and_then(|c| c.delta.content.as_deref())
    }
}

// --- Non-streaming chat completions ---

#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
pub struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
pub struct CompletionMessage {
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    pub fn message_content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.message.content.as_deref())
    }
}

// --- Scheduled jobs ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CronJob {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub schedule: Option<String>,
    #[serde(default)]
    pub enabled: bool,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, Value>,
}

/// Decode the job list out of a `cron list` tool result.
///
/// Older gateway builds nest the list under `details`, newer ones put it at
/// the top level; probe both before giving up.
pub fn decode_cron_jobs(result: &Value) -> Vec<CronJob> {
    let jobs = result
        .get("jobs")
        .or_else(|| result.get("details").and_then(|d| d.get("jobs")));
    jobs.cloned()
        .and_then(|v| serde_json::from_value(v).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn stream_chunk_with_content_delta() {
        let chunk: ChatCompletionStreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"content":"Hel"}}]}"#).unwrap();
        assert_eq!(chunk.delta_content(), Some("Hel"));
    }

    #[test]
    fn stream_chunk_role_only_has_no_content() {
        let chunk: ChatCompletionStreamChunk =
            serde_json::from_str(r#"{"choices":[{"delta":{"role":"assistant"}}]}"#).unwrap();
        assert_eq!(chunk.delta_content(), None);
    }

    #[test]
    fn stream_chunk_tolerates_extra_fields() {
        let raw = r#"{"id":"chatcmpl-1","created":1765103285,"model":"clawdbot:main","choices":[{"index":0,"delta":{"content":"x"},"finish_reason":null}]}"#;
        let chunk: ChatCompletionStreamChunk = serde_json::from_str(raw).unwrap();
        assert_eq!(chunk.delta_content(), Some("x"));
    }

    #[test]
    fn tool_response_error_maps_to_gateway_error() {
        let resp: ToolResponse = serde_json::from_value(json!({
            "ok": false,
            "error": { "type": "not_found", "message": "no such tool" }
        }))
        .unwrap();
        match resp.into_result() {
            Err(GatewayError::Gateway { kind, message }) => {
                assert_eq!(kind, "not_found");
                assert_eq!(message, "no such tool");
            }
            other => panic!("expected gateway error, got {other:?}"),
        }
    }

    #[test]
    fn cron_jobs_decode_from_top_level() {
        let result = json!({ "jobs": [{ "id": "j1", "enabled": true }] });
        let jobs = decode_cron_jobs(&result);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "j1");
        assert!(jobs[0].enabled);
    }

    #[test]
    fn cron_jobs_decode_from_details_fallback() {
        let result = json!({ "details": { "jobs": [{ "id": "j2", "name": "Nightly" }] } });
        let jobs = decode_cron_jobs(&result);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].name.as_deref(), Some("Nightly"));
    }

    #[test]
    fn cron_jobs_decode_missing_is_empty() {
        assert!(decode_cron_jobs(&json!({ "status": "ok" })).is_empty());
    }
}
