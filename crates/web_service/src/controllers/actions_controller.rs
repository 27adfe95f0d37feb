//! Quick actions: single-control prompts executed as non-streaming chat.

use actix_web::{post, web, HttpResponse};
use gateway_client::ChatMessage;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::server::AppState;

const ACTIONS_USER: &str = "mission-control-actions";

const ACTION_PROMPTS: &[(&str, &str)] = &[
    (
        "email-triage",
        "Check all email inboxes for urgent messages and summarize what needs attention. Be concise.",
    ),
    (
        "linkedin-post",
        "Run the LinkedIn daily post workflow: find a relevant article and draft a post.",
    ),
    (
        "novara-metrics",
        "Pull the latest product metrics from the analytics dashboard and give me a summary.",
    ),
    (
        "calendar-brief",
        "What's on my calendar for the next 24 hours? Be concise.",
    ),
];

#[derive(Deserialize)]
struct ActionRequest {
    action: String,
    #[serde(default)]
    params: Option<ActionParams>,
}

#[derive(Deserialize, Default)]
struct ActionParams {
    topic: Option<String>,
    prompt: Option<String>,
}

#[derive(Serialize)]
struct ActionResponse {
    ok: bool,
    response: String,
}

fn resolve_prompt(action: &str, params: ActionParams) -> Result<String> {
    match action {
        "research" => {
            let topic = params
                .topic
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| AppError::BadRequest("Topic required".to_string()))?;
            Ok(format!(
                "Research: {topic}. Give me a concise but comprehensive summary."
            ))
        }
        "compose-email" => {
            let prompt = params
                .prompt
                .filter(|p| !p.trim().is_empty())
                .ok_or_else(|| AppError::BadRequest("Prompt required".to_string()))?;
            Ok(format!("Compose an email: {prompt}"))
        }
        other => ACTION_PROMPTS
            .iter()
            .find(|(id, _)| *id == other)
            .map(|(_, prompt)| prompt.to_string())
            .ok_or_else(|| AppError::BadRequest("Unknown action".to_string())),
    }
}

#[post("")]
async fn run_action(
    state: web::Data<AppState>,
    body: web::Json<ActionRequest>,
) -> Result<HttpResponse> {
    let ActionRequest { action, params } = body.into_inner();
    let prompt = resolve_prompt(&action, params.unwrap_or_default())?;

    log::info!("running quick action '{action}'");
    let response = state
        .gateway
        .chat_simple(&[ChatMessage::user(prompt)], ACTIONS_USER)
        .await?;
    Ok(HttpResponse::Ok().json(ActionResponse { ok: true, response }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/actions").service(run_action));
}
