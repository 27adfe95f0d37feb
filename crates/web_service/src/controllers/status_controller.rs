use actix_web::{get, web, HttpResponse};

use crate::error::Result;
use crate::server::AppState;

/// Live session status passthrough; the dashboard's status bar polls this.
#[get("")]
async fn session_status(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = state.gateway.session_status().await?;
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/status").service(session_status));
}
