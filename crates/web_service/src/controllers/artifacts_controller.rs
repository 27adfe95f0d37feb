//! Workspace artifact browsing.
//!
//! The dashboard shows a fixed set of well-known workspace files plus the
//! daily memory notes; reads go through the gateway's `read` tool so file
//! access stays inside the agent's sandbox.

use std::path::{Component, Path};

use actix_web::{get, web, HttpResponse};
use chrono::{Days, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::server::AppState;

const WORKSPACE_FILES: &[(&str, &str)] = &[
    ("MEMORY.md", "memory"),
    ("SOUL.md", "document"),
    ("USER.md", "document"),
    ("AGENTS.md", "document"),
    ("TOOLS.md", "config"),
    ("IDENTITY.md", "document"),
    ("HEARTBEAT.md", "config"),
    ("memory/heartbeat-state.json", "config"),
];

#[derive(Serialize)]
struct ArtifactEntry {
    id: String,
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ReadQuery {
    #[serde(default)]
    path: String,
}

#[get("")]
async fn list_artifacts(state: web::Data<AppState>) -> Result<HttpResponse> {
    let root = &state.config.workspace_root;
    let today = Utc::now().date_naive();
    let yesterday = today - Days::new(1);

    // Dated memory files first, then the fixed table.
    let mut files: Vec<(String, String, &str)> = [today, yesterday]
        .iter()
        .map(|date| (format!("memory/{date}.md"), format!("{date}.md"), "memory"))
        .collect();
    for (rel, kind) in WORKSPACE_FILES {
        let name = rel.rsplit('/').next().unwrap_or(rel).to_string();
        files.push((rel.to_string(), name, kind));
    }

    let entries: Vec<ArtifactEntry> = files
        .into_iter()
        .enumerate()
        .map(|(i, (rel, name, kind))| ArtifactEntry {
            id: i.to_string(),
            name,
            path: root.join(rel).display().to_string(),
            kind: kind.to_string(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(json!({ "ok": true, "files": entries })))
}

#[get("/read")]
async fn read_artifact(
    state: web::Data<AppState>,
    query: web::Query<ReadQuery>,
) -> Result<HttpResponse> {
    let path = query.into_inner().path;
    if path.trim().is_empty() {
        return Err(AppError::BadRequest("Path required".to_string()));
    }

    // Only workspace files are readable through the dashboard.
    let requested = Path::new(&path);
    let escapes = requested
        .components()
        .any(|c| matches!(c, Component::ParentDir));
    if escapes || !requested.starts_with(&state.config.workspace_root) {
        return Err(AppError::Forbidden);
    }

    let response = state.gateway.read_file(&path).await?;
    match response.into_result()? {
        Some(content) => Ok(HttpResponse::Ok().json(json!({ "ok": true, "content": content }))),
        None => Err(AppError::NotFound("File".to_string())),
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/artifacts")
            .service(list_artifacts)
            .service(read_artifact),
    );
}
