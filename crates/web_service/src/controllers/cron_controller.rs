//! Scheduled job listing and control, proxied through the gateway cron tool.

use actix_web::{get, post, web, HttpResponse};
use gateway_client::models::{decode_cron_jobs, CronJob};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};
use crate::server::AppState;

#[derive(Serialize)]
struct CronListResponse {
    ok: bool,
    jobs: Vec<CronJob>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CronActionRequest {
    action: String,
    #[serde(default)]
    job_id: Option<String>,
    #[serde(default)]
    enabled: Option<bool>,
}

#[get("")]
async fn list_jobs(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = state.gateway.list_cron_jobs().await?;
    let result = response.into_result()?.unwrap_or(Value::Null);
    let jobs = decode_cron_jobs(&result);
    Ok(HttpResponse::Ok().json(CronListResponse { ok: true, jobs }))
}

#[post("")]
async fn job_action(
    state: web::Data<AppState>,
    body: web::Json<CronActionRequest>,
) -> Result<HttpResponse> {
    let CronActionRequest {
        action,
        job_id,
        enabled,
    } = body.into_inner();

    let response = match (action.as_str(), job_id, enabled) {
        ("run", Some(job_id), _) => {
            log::info!("running cron job {job_id}");
            state.gateway.run_cron_job(&job_id).await?
        }
        ("toggle", Some(job_id), Some(enabled)) => {
            log::info!("toggling cron job {job_id} -> enabled={enabled}");
            state.gateway.toggle_cron_job(&job_id, enabled).await?
        }
        _ => return Err(AppError::BadRequest("Invalid action".to_string())),
    };
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/cron").service(list_jobs).service(job_action));
}
