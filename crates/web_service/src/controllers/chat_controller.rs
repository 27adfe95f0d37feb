//! Chat endpoints: gateway health check and the chat proxy.
//!
//! The streaming path re-emits tokens from the gateway stream to the
//! dashboard as `text/event-stream` chunks through an mpsc channel. When the
//! dashboard disconnects, the send side fails and the upstream read is
//! cancelled at its next suspension point.

use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};
use bytes::Bytes;
use gateway_client::{ChatMessage, StreamOutcome};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio_stream::wrappers::UnboundedReceiverStream;
use tokio_util::sync::CancellationToken;

use crate::error::{AppError, Result};
use crate::server::AppState;

const CHAT_USER: &str = "mission-control-chat";

#[derive(Deserialize)]
struct ChatRequest {
    messages: Vec<ChatMessage>,
    #[serde(default = "default_stream")]
    stream: bool,
}

fn default_stream() -> bool {
    true
}

#[derive(Serialize)]
struct ChatResponse {
    ok: bool,
    response: String,
}

#[get("")]
async fn gateway_health(state: web::Data<AppState>) -> HttpResponse {
    match state.status.latest().await {
        Some(status) => HttpResponse::Ok().json(status),
        None => HttpResponse::Ok().json(json!({ "ok": false, "error": "Connection failed" })),
    }
}

#[post("")]
async fn chat(state: web::Data<AppState>, body: web::Json<ChatRequest>) -> Result<HttpResponse> {
    let ChatRequest { messages, stream } = body.into_inner();
    if messages.is_empty() {
        return Err(AppError::BadRequest("Messages array required".to_string()));
    }

    if stream {
        return Ok(stream_chat(&state, messages));
    }

    let response = state.gateway.chat_simple(&messages, CHAT_USER).await?;
    Ok(HttpResponse::Ok().json(ChatResponse { ok: true, response }))
}

fn sse_frame(token: &str) -> Bytes {
    let chunk = json!({
        "id": format!("chatcmpl-{}", uuid::Uuid::new_v4()),
        "object": "chat.completion.chunk",
        "created": chrono::Utc::now().timestamp(),
        "choices": [{ "index": 0, "delta": { "content": token }, "finish_reason": null }],
    });
    Bytes::from(format!("data: {chunk}\n\n"))
}

fn stream_chat(state: &web::Data<AppState>, messages: Vec<ChatMessage>) -> HttpResponse {
    let (tx, rx) = tokio::sync::mpsc::unbounded_channel::<std::result::Result<Bytes, AppError>>();
    let gateway = Arc::clone(&state.gateway);
    let cancel = CancellationToken::new();

    tokio::spawn(async move {
        let token_tx = tx.clone();
        let drop_cancel = cancel.clone();
        let outcome = gateway
            .chat_stream(&messages, CHAT_USER, cancel.clone(), move |token| {
                if token_tx.send(Ok(sse_frame(token))).is_err() {
                    // Dashboard went away; stop reading from the gateway.
                    drop_cancel.cancel();
                }
            })
            .await;

        match outcome {
            Ok(StreamOutcome::Completed(full)) => {
                log::info!("chat stream completed with {} chars", full.len());
                let _ = tx.send(Ok(Bytes::from_static(b"data: [DONE]\n\n")));
            }
            Ok(StreamOutcome::Cancelled) => {}
            Err(err) => {
                log::error!("chat stream failed: {err}");
                let _ = tx.send(Err(AppError::Gateway(err)));
            }
        }
    });

    HttpResponse::Ok()
        .content_type("text/event-stream")
        .insert_header(("Cache-Control", "no-cache"))
        .streaming(UnboundedReceiverStream::new(rx))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/chat").service(gateway_health).service(chat));
}
